//! Shared types for oracle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome label meaning "not enough information yet".
///
/// Keeps the oracle `Active` so resolution can be retried later.
pub const UNDETERMINED_OUTCOME: &str = "UNDETERMINED";

/// Outcome label meaning "an outcome exists but is not one we can report".
pub const ERROR_OUTCOME: &str = "ERROR";

/// Lifecycle status of an oracle.
///
/// `Resolved` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Resolved,
    Error,
}

impl Status {
    /// The label exposed through `get_status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Resolved => "Resolved",
            Status::Error => "Error",
        }
    }

    /// Check if no further resolution is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Active)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the evidence for a resolution comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceMode {
    /// Fixed list of resolution URLs chosen at deployment.
    FixedSources,

    /// Caller supplies one evidence URL whose host must be allow-listed.
    DomainAllowList,
}
