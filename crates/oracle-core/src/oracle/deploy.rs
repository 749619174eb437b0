//! Construction-time validation and normalization.

use thiserror::Error;
use tracing::debug;

use super::Oracle;
use crate::domains::normalize_domains;
use crate::params::{parse_resolution_date, OracleParams};
use crate::types::{Status, ERROR_OUTCOME, UNDETERMINED_OUTCOME};

/// Errors that reject a deployment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Missing resolution URLs or data source domains")]
    MissingEvidenceSource,

    #[error("Cannot provide both resolution URLs and data source domains")]
    ConflictingEvidenceSources,

    #[error("At least two potential outcomes are required, found {0}")]
    TooFewOutcomes(usize),

    #[error("Potential outcome #{0} is blank")]
    BlankOutcome(usize),

    #[error("'{0}' is reserved and cannot be a potential outcome")]
    ReservedOutcome(String),

    #[error("Potential outcomes must be unique: '{0}' appears more than once")]
    DuplicateOutcome(String),

    #[error("Invalid earliest resolution date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
}

fn trimmed(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

fn validate_outcomes(raw: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut outcomes: Vec<String> = Vec::with_capacity(raw.len());

    for (i, outcome) in raw.iter().enumerate() {
        let outcome = outcome.trim();
        if outcome.is_empty() {
            return Err(ValidationError::BlankOutcome(i));
        }
        outcomes.push(outcome.to_string());
    }

    if outcomes.len() < 2 {
        return Err(ValidationError::TooFewOutcomes(outcomes.len()));
    }

    if let Some(reserved) = outcomes
        .iter()
        .find(|o| *o == UNDETERMINED_OUTCOME || *o == ERROR_OUTCOME)
    {
        return Err(ValidationError::ReservedOutcome(reserved.clone()));
    }

    for (i, outcome) in outcomes.iter().enumerate() {
        if outcomes[..i].contains(outcome) {
            return Err(ValidationError::DuplicateOutcome(outcome.clone()));
        }
    }

    Ok(outcomes)
}

impl Oracle {
    /// Validate `params` and create an `Active` oracle owned by `creator`.
    ///
    /// Checks run in a fixed order: required fields, evidence configuration,
    /// outcomes, then the date. The first failure is returned.
    pub fn deploy(
        params: OracleParams,
        creator: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let prediction_market_id = require(&params.prediction_market_id, "prediction_market_id")?;
        let title = require(&params.title, "title")?;
        let description = require(&params.description, "description")?;
        if params.potential_outcomes.is_empty() {
            return Err(ValidationError::MissingField("potential_outcomes"));
        }
        let rules = trimmed(&params.rules);
        if rules.is_empty() {
            return Err(ValidationError::MissingField("rules"));
        }
        let raw_date = require(&params.earliest_resolution_date, "earliest_resolution_date")?;

        let resolution_urls = trimmed(&params.resolution_urls);
        let data_source_domains = normalize_domains(&params.data_source_domains);
        match (resolution_urls.is_empty(), data_source_domains.is_empty()) {
            (true, true) => return Err(ValidationError::MissingEvidenceSource),
            (false, false) => return Err(ValidationError::ConflictingEvidenceSources),
            _ => {}
        }

        let potential_outcomes = validate_outcomes(&params.potential_outcomes)?;

        let earliest_resolution_date =
            parse_resolution_date(&raw_date).map_err(|e| ValidationError::InvalidDate {
                value: raw_date.clone(),
                reason: e.to_string(),
            })?;

        let oracle = Self {
            prediction_market_id,
            creator: creator.into(),
            title,
            description,
            potential_outcomes,
            rules,
            data_source_domains,
            resolution_urls,
            earliest_resolution_date,
            status: Status::Active,
            analysis: None,
            outcome: None,
        };

        debug!(
            market = %oracle.prediction_market_id,
            mode = ?oracle.evidence_mode(),
            outcomes = oracle.potential_outcomes.len(),
            "Oracle deployed"
        );

        Ok(oracle)
    }
}
