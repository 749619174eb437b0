//! Extraction of a JSON object from raw model output.
//!
//! Models wrap their answer in prose, code fences, or leave trailing commas.
//! The sanitizer keeps everything from the first `{` to the last `}`, drops
//! commas that directly precede a closing `}` or `]`, and parses the rest.
//! Anything else is an error: there is no best-effort repair beyond that.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from sanitizing model output.
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Verdict does not match the expected schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),
}

/// Extract and parse the single JSON object embedded in `raw`.
pub fn sanitize(raw: &str) -> Result<Map<String, Value>, SanitizeError> {
    let slice = extract_object(raw).ok_or(SanitizeError::NoJsonObject)?;
    let repaired = strip_trailing_commas(slice);
    Ok(serde_json::from_str(&repaired)?)
}

/// Slice from the first `{` to the last `}`, inclusive.
fn extract_object(raw: &str) -> Option<&str> {
    let first = raw.find('{')?;
    let last = raw.rfind('}')?;
    if last < first {
        return None;
    }
    Some(&raw[first..=last])
}

/// Remove commas whose next non-whitespace character closes an object or array.
///
/// Commas inside string literals are left alone.
fn strip_trailing_commas(json: &str) -> String {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if closes_next(&chars[i + 1..]) => {}
            _ => out.push(c),
        }
    }

    out
}

fn closes_next(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| matches!(c, '}' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_noise_and_trailing_comma() {
        let map = sanitize("noise {\"a\": 1, \"b\": 2,} trailing").unwrap();
        assert_eq!(Value::Object(map), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_code_fence() {
        let raw = "Sure! Here is the result:\n```json\n{\n  \"outcome\": \"Arsenal\",\n  \"reasoning\": \"3-1\"\n}\n```\nLet me know.";
        let map = sanitize(raw).unwrap();
        assert_eq!(map["outcome"], "Arsenal");
    }

    #[test]
    fn test_nested_trailing_commas() {
        let raw = r#"{"relevant_sources": ["https://a.com", "https://b.com",], "meta": {"x": 1,}, }"#;
        let map = sanitize(raw).unwrap();
        assert_eq!(map["relevant_sources"], json!(["https://a.com", "https://b.com"]));
        assert_eq!(map["meta"], json!({"x": 1}));
    }

    #[test]
    fn test_commas_between_values_kept() {
        let raw = r#"{"a": [1, 2, {"b": 3}], "c": "d"}"#;
        let map = sanitize(raw).unwrap();
        assert_eq!(map["a"], json!([1, 2, {"b": 3}]));
        assert_eq!(map["c"], "d");
    }

    #[test]
    fn test_commas_inside_strings_kept() {
        let raw = r#"{"reasoning": "scores were 1,} and 2,]", "outcome": "A"}"#;
        let map = sanitize(raw).unwrap();
        assert_eq!(map["reasoning"], "scores were 1,} and 2,]");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let raw = r#"{"reasoning": "the \"final\", that is,", "outcome": "A",}"#;
        let map = sanitize(raw).unwrap();
        assert_eq!(map["reasoning"], "the \"final\", that is,");
    }

    #[test]
    fn test_no_braces() {
        let result = sanitize("The answer is Bayern Munich.");
        assert!(matches!(result, Err(SanitizeError::NoJsonObject)));
    }

    #[test]
    fn test_reversed_braces() {
        let result = sanitize("} nothing here {");
        assert!(matches!(result, Err(SanitizeError::NoJsonObject)));
    }

    #[test]
    fn test_invalid_json() {
        let result = sanitize("{outcome: Bayern}");
        assert!(matches!(result, Err(SanitizeError::InvalidJson(_))));
    }

    #[test]
    fn test_two_objects_is_invalid() {
        let result = sanitize(r#"{"a": 1} and {"b": 2}"#);
        assert!(matches!(result, Err(SanitizeError::InvalidJson(_))));
    }

    proptest! {
        #[test]
        fn prop_wrapped_object_round_trips(
            entries in proptest::collection::btree_map("[a-z_]{1,12}", any::<i64>(), 1..6),
            prefix in "[^{}]{0,30}",
            suffix in "[^{}]{0,30}",
        ) {
            let body = entries
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            let raw = format!("{}{{{},}}{}", prefix, body, suffix);

            let map = sanitize(&raw).unwrap();
            prop_assert_eq!(map.len(), entries.len());
            for (k, v) in &entries {
                prop_assert_eq!(map[k].as_i64(), Some(*v));
            }
        }
    }
}
