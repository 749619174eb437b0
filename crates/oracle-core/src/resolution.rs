//! Classification of a final verdict into a status transition.
//!
//! | Reported outcome              | Status   | `outcome` |
//! |-------------------------------|----------|-----------|
//! | `UNDETERMINED`                | Active   | unset     |
//! | `ERROR`                       | Error    | unset     |
//! | not listed / null / non-string| Error    | unset     |
//! | one of the potential outcomes | Resolved | set       |
//!
//! The `analysis` field is stored in every case.

use crate::types::{Status, ERROR_OUTCOME, UNDETERMINED_OUTCOME};
use crate::verdict::Verdict;

/// What a final verdict means for the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Determination {
    /// The verdict names one of the potential outcomes.
    Outcome(String),

    /// Not enough information yet; the oracle stays open.
    Undetermined,

    /// `ERROR`, an unknown label, or no label at all.
    Failed { reported: Option<String> },
}

impl Determination {
    /// Status the oracle moves to.
    pub fn status(&self) -> Status {
        match self {
            Determination::Outcome(_) => Status::Resolved,
            Determination::Undetermined => Status::Active,
            Determination::Failed { .. } => Status::Error,
        }
    }

    /// The winning outcome, if any.
    pub fn outcome(&self) -> Option<&str> {
        match self {
            Determination::Outcome(o) => Some(o),
            _ => None,
        }
    }
}

/// Classify `verdict` against the oracle's potential outcomes.
///
/// Matching is exact and case-sensitive.
pub fn determine(verdict: &Verdict, potential_outcomes: &[String]) -> Determination {
    match verdict.outcome() {
        Some(UNDETERMINED_OUTCOME) => Determination::Undetermined,
        Some(ERROR_OUTCOME) => Determination::Failed {
            reported: Some(ERROR_OUTCOME.to_string()),
        },
        Some(label) if potential_outcomes.iter().any(|o| o == label) => {
            Determination::Outcome(label.to_string())
        }
        other => Determination::Failed {
            reported: other.map(str::to_string),
        },
    }
}
