//! # oracle-core
//!
//! Deterministic state machine for LLM-resolved prediction market oracles.
//!
//! This crate owns everything about an oracle that must be identical on every
//! validator node:
//! - Construction-time validation and normalization of the market parameters
//! - Resolution preconditions (status, earliest date, evidence mode, evidence domain)
//! - Sanitizing raw LLM text into a JSON verdict and checking its schema
//! - Applying the final verdict to the persisted `status` / `outcome` / `analysis`
//!
//! ## Key Guarantees
//!
//! 1. **No I/O**: fetching evidence and calling models happens in `oracle-runtime`
//! 2. **Deterministic**: the same verdict applied to the same oracle yields the same state
//! 3. **All-or-nothing**: persisted fields change only in [`Oracle::apply_verdict`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use oracle_core::{Oracle, OracleParams, Verdict, VerdictKind};
//!
//! let params = OracleParams::from_yaml_file("market.yaml")?;
//! let mut oracle = Oracle::deploy(params, "0xcreator")?;
//!
//! let plan = oracle.plan_resolution(chrono::Utc::now(), None)?;
//! // ... runtime evaluates plan.sources and aggregates ...
//! let verdict = Verdict::parse(raw_llm_text, VerdictKind::Aggregate)?;
//! oracle.apply_verdict(verdict)?;
//! println!("{}", oracle.get_status());
//! ```

pub mod domains;
pub mod oracle;
pub mod params;
pub mod resolution;
pub mod sanitizer;
pub mod types;
pub mod verdict;

// Re-export main types at crate root
pub use domains::{evidence_host, is_allowed_evidence, normalize_domain};
pub use oracle::{Oracle, ResolutionPlan, StateError, ValidationError};
pub use params::{parse_resolution_date, OracleParams, ParamsError};
pub use resolution::{determine, Determination};
pub use sanitizer::{sanitize, SanitizeError};
pub use types::{EvidenceMode, Status, ERROR_OUTCOME, UNDETERMINED_OUTCOME};
pub use verdict::{SourceVerdict, Verdict, VerdictKind};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_deploy_plan_and_resolve() {
        let params = OracleParams::from_yaml(
            r#"
prediction_market_id: "1"
title: "Champions League Final"
description: "Who wins the final?"
potential_outcomes: ["Bayern Munich", "Arsenal"]
rules: ["The outcome is the winner of the match, including extra time"]
resolution_urls: ["https://www.bbc.com/sport/football/scores-fixtures/2024-10-09"]
earliest_resolution_date: "2024-01-01T00:00:00+00:00"
"#,
        )
        .unwrap();

        let mut oracle = Oracle::deploy(params, "0xcreator").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 10, 10, 12, 0, 0).unwrap();
        let plan = oracle.plan_resolution(now, None).unwrap();
        assert_eq!(plan.sources.len(), 1);

        let verdict = Verdict::parse(
            r#"Here is my answer: {"relevant_sources": [], "reasoning": "Bayern won 2-1", "outcome": "Bayern Munich",}"#,
            VerdictKind::Aggregate,
        )
        .unwrap();
        oracle.apply_verdict(verdict).unwrap();

        assert_eq!(oracle.get_status(), "Resolved");
        assert_eq!(oracle.outcome(), Some("Bayern Munich"));
    }
}
