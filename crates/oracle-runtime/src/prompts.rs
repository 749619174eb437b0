//! Prompts for the two resolution phases.
//!
//! Both prompts embed the market as tagged sections so validators see
//! byte-identical inputs for the same oracle, sources and timestamp. Lists
//! are rendered as JSON arrays to keep their order and quoting unambiguous.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use oracle_core::{Oracle, SourceVerdict};

/// System prompt shared by both phases.
pub const SYSTEM_PROMPT: &str = "You are an AI Validator resolving a prediction market. \
You answer with a single JSON object and nothing else.";

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn market_inputs(oracle: &Oracle) -> String {
    format!(
        "<title>\n{}\n</title>\n\n\
         <description>\n{}\n</description>\n\n\
         <potential_outcomes>\n{}\n</potential_outcomes>\n\n\
         <rules>\n{}\n</rules>",
        oracle.title(),
        oracle.description(),
        json_list(oracle.potential_outcomes()),
        json_list(oracle.rules()),
    )
}

fn dates(oracle: &Oracle, now: DateTime<Utc>) -> String {
    format!(
        "<current_date>\n{}\n</current_date>\n\n\
         <earliest_resolution_date>\n{}\n</earliest_resolution_date>",
        timestamp(now),
        oracle.earliest_resolution_date().to_rfc3339(),
    )
}

const SOURCE_TASK: &str = r#"
### Your Task
1. Analyze the inputs:
- Carefully read and interpret the user-defined rules.
- Extract the information in the webpage content that is relevant to the rules.
- Determine if the source pertains to the event being predicted.
- Determine if the event has occurred yet.

2. Provide reasoning:
- Write clear, self-contained reasoning for the outcome.
- Reference the specific rules and extracted data that support your decision.

3. Determine the outcome:
- Decide which potential outcome is correct based on this source.
- If an outcome can be determined but it is not in the list of potential outcomes, the outcome is `ERROR`.
- If the information is insufficient or inconclusive, or the event has not occurred yet, the outcome is `UNDETERMINED`.

### Output Format
Respond with valid JSON only, with this structure:

{
    "valid_source": true,
    "event_has_occurred": true,
    "reasoning": "Your detailed reasoning here",
    "outcome": "One of the potential outcomes, `UNDETERMINED` or `ERROR`"
}

Base your decision strictly on the inputs. Do not include trailing commas.
"#;

const AGGREGATE_TASK: &str = r#"
### Your Task
1. Analyze the inputs:
- Carefully read and interpret the user-defined rules.
- Take into account the processed data from every source.
- Consider the resolution dates to ensure the data is timely.

2. Determine the outcome:
- The outcome must follow from the processed data of the resolution sources.
- If an outcome can be determined but it is not in the list of potential outcomes, the outcome is `ERROR`.
- If the information is insufficient or inconclusive, the outcome is `UNDETERMINED`.
- If sources contradict each other, apply the rules to resolve the contradiction.
- If the rules do not resolve the contradiction, the outcome is `ERROR`.

### Output Format
Respond with valid JSON only, with this structure:

{
    "relevant_sources": ["URLs relevant to the outcome"],
    "reasoning": "Your detailed reasoning here",
    "outcome": "One of the potential outcomes, `UNDETERMINED` or `ERROR`"
}

Base your decision strictly on the inputs. Do not include trailing commas.
"#;

/// Phase 1 prompt for a single evidence source.
pub fn source_prompt(
    oracle: &Oracle,
    source_url: &str,
    content: &str,
    now: DateTime<Utc>,
) -> String {
    format!(
        "Determine the outcome of this prediction market from one data source, \
         using the user-defined rules, the webpage content and the list of potential outcomes.\n\n\
         ### Inputs\n{}\n\n<source_url>\n{}\n</source_url>\n\n\
         <webpage_content>\n{}\n</webpage_content>\n\n{}\n{}",
        market_inputs(oracle),
        source_url,
        content,
        dates(oracle, now),
        SOURCE_TASK,
    )
}

/// Phase 2 prompt reconciling every per-source verdict.
pub fn aggregate_prompt(oracle: &Oracle, verdicts: &[SourceVerdict], now: DateTime<Utc>) -> String {
    let processed: Vec<Value> = verdicts
        .iter()
        .map(|sv| json!({ "source_url": sv.source_url, "analysis": sv.verdict }))
        .collect();
    let processed =
        serde_json::to_string_pretty(&processed).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Determine the outcome of this prediction market from the processed data \
         of all of its data sources.\n\n\
         ### Inputs\n{}\n\n<processed_data>\n{}\n</processed_data>\n\n{}\n{}",
        market_inputs(oracle),
        processed,
        dates(oracle, now),
        AGGREGATE_TASK,
    )
}
