//! Structured verdicts produced by the resolution prompts.
//!
//! A verdict is the JSON object a model returns, after sanitization and a
//! schema check that only requires an `outcome` key. Only `outcome` is
//! load-bearing for consensus; the remaining fields are kept verbatim so they
//! can be stored in `analysis` and shown to the aggregation step. Accessors
//! read a field of the wrong type as absent.

mod schema;

pub use schema::{validate_verdict, VerdictKind};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::sanitizer::{sanitize, SanitizeError};

/// A sanitized, schema-checked verdict object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verdict(Map<String, Value>);

impl Verdict {
    /// Sanitize raw model text and check it against the schema for `kind`.
    pub fn parse(raw: &str, kind: VerdictKind) -> Result<Self, SanitizeError> {
        let map = sanitize(raw)?;
        Self::from_object(map, kind)
    }

    /// Check an already-parsed object against the schema for `kind`.
    pub fn from_object(
        map: Map<String, Value>,
        kind: VerdictKind,
    ) -> Result<Self, SanitizeError> {
        let verdict = Self(map);
        validate_verdict(kind, &verdict.to_value()).map_err(SanitizeError::SchemaViolation)?;
        Ok(verdict)
    }

    /// The reported outcome, if it is a string.
    ///
    /// A `null` or non-string outcome yields `None` and is treated as out of
    /// range.
    pub fn outcome(&self) -> Option<&str> {
        self.0.get("outcome").and_then(Value::as_str)
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.0.get("reasoning").and_then(Value::as_str)
    }

    /// Whether the source was judged usable (per-source verdicts).
    pub fn valid_source(&self) -> Option<bool> {
        self.flag("valid_source")
    }

    /// Whether the event was judged to have happened (per-source verdicts).
    pub fn event_has_occurred(&self) -> Option<bool> {
        self.flag("event_has_occurred")
    }

    /// Sources the aggregation step relied on, in the order given.
    pub fn relevant_sources(&self) -> Vec<String> {
        match self.0.get("relevant_sources") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Raw access to any field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    // Models sometimes quote booleans.
    fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

/// A per-source verdict paired with the URL it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVerdict {
    pub source_url: String,
    pub verdict: Verdict,
}

impl SourceVerdict {
    pub fn new(source_url: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            source_url: source_url.into(),
            verdict,
        }
    }
}
