//! The oracle state machine.
//!
//! An [`Oracle`] is created once through [`Oracle::deploy`], which validates
//! and normalizes the market parameters. After that only `status`,
//! `analysis` and `outcome` ever change, and only through
//! [`Oracle::apply_verdict`] once the runtime has produced an agreed verdict.

mod deploy;
mod lifecycle;

pub use deploy::ValidationError;
pub use lifecycle::{ResolutionPlan, StateError};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::types::{EvidenceMode, Status};
use crate::verdict::Verdict;

/// A deployed oracle for one prediction market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oracle {
    prediction_market_id: String,
    creator: String,
    title: String,
    description: String,
    potential_outcomes: Vec<String>,
    rules: Vec<String>,
    data_source_domains: Vec<String>,
    resolution_urls: Vec<String>,
    earliest_resolution_date: DateTime<FixedOffset>,
    status: Status,
    analysis: Option<Verdict>,
    outcome: Option<String>,
}

impl Oracle {
    pub fn prediction_market_id(&self) -> &str {
        &self.prediction_market_id
    }

    /// Identity of the deploying account.
    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn potential_outcomes(&self) -> &[String] {
        &self.potential_outcomes
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn data_source_domains(&self) -> &[String] {
        &self.data_source_domains
    }

    pub fn resolution_urls(&self) -> &[String] {
        &self.resolution_urls
    }

    pub fn earliest_resolution_date(&self) -> DateTime<FixedOffset> {
        self.earliest_resolution_date
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The last aggregate verdict, once a resolution attempt has concluded.
    pub fn analysis(&self) -> Option<&Verdict> {
        self.analysis.as_ref()
    }

    /// The winning outcome, set only when `Resolved`.
    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    /// Which evidence configuration this oracle was deployed with.
    pub fn evidence_mode(&self) -> EvidenceMode {
        if self.resolution_urls.is_empty() {
            EvidenceMode::DomainAllowList
        } else {
            EvidenceMode::FixedSources
        }
    }

    /// Status label: `Active`, `Resolved` or `Error`.
    pub fn get_status(&self) -> &'static str {
        self.status.as_str()
    }

    /// Flat snapshot of every persisted field.
    ///
    /// Lists stay ordered, the date is ISO-8601, and absent values are `null`.
    pub fn get_dict(&self) -> Map<String, Value> {
        let analysis = self
            .analysis
            .as_ref()
            .map(Verdict::to_value)
            .unwrap_or(Value::Null);

        let snapshot = json!({
            "creator": self.creator,
            "title": self.title,
            "description": self.description,
            "potential_outcomes": self.potential_outcomes,
            "rules": self.rules,
            "data_source_domains": self.data_source_domains,
            "resolution_urls": self.resolution_urls,
            "status": self.status.as_str(),
            "earliest_resolution_date": self.earliest_resolution_date.to_rfc3339(),
            "analysis": analysis,
            "outcome": self.outcome,
            "prediction_market_id": self.prediction_market_id,
        });

        match snapshot {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}
