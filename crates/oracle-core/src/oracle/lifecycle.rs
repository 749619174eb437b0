//! Resolution preconditions and outcome application.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;
use tracing::debug;

use super::Oracle;
use crate::domains::is_allowed_evidence;
use crate::resolution::{determine, Determination};
use crate::types::{EvidenceMode, Status};
use crate::verdict::Verdict;

/// Errors from calling `resolve` on an oracle that cannot accept it.
///
/// The oracle is never modified when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Cannot resolve an oracle in status {0}")]
    NotActive(Status),

    #[error("Cannot resolve before the earliest resolution date ({earliest}); now is {now}")]
    TooEarly {
        now: DateTime<Utc>,
        earliest: DateTime<FixedOffset>,
    },

    #[error("An evidence URL was provided but the oracle uses fixed resolution URLs")]
    UnexpectedEvidence,

    #[error("No evidence URL provided and the oracle has no fixed resolution URLs")]
    MissingEvidence,

    #[error("The evidence URL '{0}' does not match any of the data source domains")]
    EvidenceRejected(String),
}

/// What a resolution attempt has to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// URLs to evaluate in Phase 1, in order
    pub sources: Vec<String>,

    /// The caller-supplied evidence URL, if any
    pub evidence_url: Option<String>,

    /// Timestamp shown to the model as the current date
    pub now: DateTime<Utc>,
}

impl Oracle {
    /// Check whether an evidence URL's host is one of the allow-listed domains.
    pub fn check_evidence(&self, url: &str) -> bool {
        is_allowed_evidence(url, &self.data_source_domains)
    }

    /// Check every resolution precondition and list the sources to evaluate.
    ///
    /// Preconditions are checked in order and the first failure wins:
    /// status, earliest date, evidence mode, evidence domain. An empty
    /// evidence URL counts as none.
    pub fn plan_resolution(
        &self,
        now: DateTime<Utc>,
        evidence_url: Option<&str>,
    ) -> Result<ResolutionPlan, StateError> {
        if self.status != Status::Active {
            return Err(StateError::NotActive(self.status));
        }

        if now < self.earliest_resolution_date.with_timezone(&Utc) {
            return Err(StateError::TooEarly {
                now,
                earliest: self.earliest_resolution_date,
            });
        }

        let evidence_url = evidence_url.map(str::trim).filter(|u| !u.is_empty());

        let sources = match (self.evidence_mode(), evidence_url) {
            (EvidenceMode::FixedSources, Some(_)) => return Err(StateError::UnexpectedEvidence),
            (EvidenceMode::FixedSources, None) => self.resolution_urls.clone(),
            (EvidenceMode::DomainAllowList, None) => return Err(StateError::MissingEvidence),
            (EvidenceMode::DomainAllowList, Some(url)) => {
                if !self.check_evidence(url) {
                    return Err(StateError::EvidenceRejected(url.to_string()));
                }
                vec![url.to_string()]
            }
        };

        Ok(ResolutionPlan {
            sources,
            evidence_url: evidence_url.map(str::to_string),
            now,
        })
    }

    /// Apply an agreed aggregate verdict.
    ///
    /// The verdict is stored as `analysis` in every case. The status moves
    /// to `Resolved` for a listed outcome, to `Error` for `ERROR` or an
    /// unknown outcome, and stays `Active` for `UNDETERMINED`.
    pub fn apply_verdict(&mut self, verdict: Verdict) -> Result<Determination, StateError> {
        if self.status != Status::Active {
            return Err(StateError::NotActive(self.status));
        }

        let determination = determine(&verdict, &self.potential_outcomes);

        self.analysis = Some(verdict);
        self.outcome = determination.outcome().map(str::to_string);
        self.status = determination.status();

        debug!(
            market = %self.prediction_market_id,
            status = %self.status,
            outcome = ?self.outcome,
            "Verdict applied"
        );

        Ok(determination)
    }
}
