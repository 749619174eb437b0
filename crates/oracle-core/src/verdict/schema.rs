//! JSON Schema validation for verdicts.
//!
//! Both verdict kinds must be objects carrying an `outcome` key. Field types
//! are not enforced: a wrongly typed `outcome` still has to reach outcome
//! application so the oracle can move to `Error`, and the accessors on
//! [`Verdict`](super::Verdict) read ill-typed fields as absent.

use std::sync::OnceLock;

use serde_json::Value;

const SOURCE_VERDICT_SCHEMA_JSON: &str = include_str!("../../schemas/source_verdict.schema.json");
const AGGREGATE_VERDICT_SCHEMA_JSON: &str =
    include_str!("../../schemas/aggregate_verdict.schema.json");

static SOURCE_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();
static AGGREGATE_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Which step produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerdictKind {
    /// Phase 1: one evidence source
    Source,

    /// Phase 2: reconciliation of all sources
    Aggregate,
}

impl VerdictKind {
    fn schema(self) -> (&'static OnceLock<Result<jsonschema::Validator, String>>, &'static str) {
        match self {
            VerdictKind::Source => (&SOURCE_SCHEMA, SOURCE_VERDICT_SCHEMA_JSON),
            VerdictKind::Aggregate => (&AGGREGATE_SCHEMA, AGGREGATE_VERDICT_SCHEMA_JSON),
        }
    }
}

fn compile(raw: &str) -> Result<jsonschema::Validator, String> {
    let schema_value: Value =
        serde_json::from_str(raw).map_err(|e| format!("Invalid schema JSON: {}", e))?;
    jsonschema::options()
        .build(&schema_value)
        .map_err(|e| format!("Failed to compile schema: {}", e))
}

/// Validate a verdict value against the schema for `kind`.
///
/// Returns every violation message on failure.
pub fn validate_verdict(kind: VerdictKind, verdict: &Value) -> Result<(), Vec<String>> {
    let (cell, raw) = kind.schema();
    let validator = cell
        .get_or_init(|| compile(raw))
        .as_ref()
        .map_err(|e| vec![e.clone()])?;

    let errors: Vec<String> = validator
        .iter_errors(verdict)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
