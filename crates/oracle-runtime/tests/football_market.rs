//! End-to-end resolution of football prediction markets against scripted
//! collaborators.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use oracle_core::{Oracle, OracleParams, StateError, Status};
use oracle_runtime::testing::{ScriptedFetcher, ScriptedProvider};
use oracle_runtime::{FetchError, OracleRuntime, ProviderError, RuntimeConfig, RuntimeError};

const MATCH_2024_10_09: &str = "https://www.bbc.com/sport/football/scores-fixtures/2024-10-09";
const MATCH_2024_10_10: &str = "https://www.bbc.com/sport/football/scores-fixtures/2024-10-10";

fn after_match() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 11, 8, 0, 0).unwrap()
}

fn runtime(provider: Arc<ScriptedProvider>, fetcher: Arc<ScriptedFetcher>) -> OracleRuntime {
    runtime_with(provider, fetcher, RuntimeConfig::default(), after_match())
}

fn runtime_with(
    provider: Arc<ScriptedProvider>,
    fetcher: Arc<ScriptedFetcher>,
    config: RuntimeConfig,
    now: DateTime<Utc>,
) -> OracleRuntime {
    OracleRuntime::builder()
        .provider(provider)
        .fetcher(fetcher)
        .config(config)
        .fixed_time(now)
        .build()
        .unwrap()
}

fn bayern_arsenal() -> Oracle {
    let params = OracleParams::new("1", "Football Prediction Market", "A market test")
        .outcomes(["Bayern Munich", "Arsenal"])
        .rules(["The outcome is the result of the match"])
        .resolution_urls([MATCH_2024_10_09])
        .earliest_resolution_date("2024-01-01T00:00:00+00:00");
    Oracle::deploy(params, "0xcreator").unwrap()
}

fn italy_belgium_by_domain() -> Oracle {
    let params = OracleParams::new(
        "unexpected_outcome_test",
        "Football Prediction Market - Unexpected Outcome Test",
        "Testing market behavior with unexpected draw outcome",
    )
    .outcomes(["Italy", "Belgium"])
    .rules(["The outcome is the result of the match"])
    .data_source_domains(["https://www.bbc.com"])
    .earliest_resolution_date("2024-01-01T00:00:00+00:00");
    Oracle::deploy(params, "0xcreator").unwrap()
}

#[tokio::test]
async fn predefined_source_resolves_to_listed_outcome() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when(
                "<processed_data>",
                r#"```json
{
  "relevant_sources": ["https://www.bbc.com/sport/football/scores-fixtures/2024-10-09"],
  "reasoning": "The only source reports Bayern Munich beating Arsenal 2-1.",
  "outcome": "Bayern Munich",
}
```"#,
            )
            .reply_when(
                "<webpage_content>",
                r#"{"valid_source": "true", "event_has_occurred": "true", "reasoning": "Bayern Munich 2-1 Arsenal, full time.", "outcome": "Bayern Munich"}"#,
            ),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(
        MATCH_2024_10_09,
        "Champions League. Bayern Munich 2 - 1 Arsenal. Full time.",
    ));

    let mut oracle = bayern_arsenal();
    let initial = oracle.get_dict();
    assert_eq!(
        serde_json::Value::Object(initial),
        json!({
            "creator": "0xcreator",
            "title": "Football Prediction Market",
            "description": "A market test",
            "potential_outcomes": ["Bayern Munich", "Arsenal"],
            "rules": ["The outcome is the result of the match"],
            "data_source_domains": [],
            "resolution_urls": [MATCH_2024_10_09],
            "status": "Active",
            "earliest_resolution_date": "2024-01-01T00:00:00+00:00",
            "analysis": null,
            "outcome": null,
            "prediction_market_id": "1",
        })
    );

    let report = runtime(provider.clone(), fetcher.clone())
        .resolve(&mut oracle, None)
        .await
        .unwrap();

    assert_eq!(report.status, Status::Resolved);
    assert_eq!(oracle.get_status(), "Resolved");
    assert_eq!(oracle.outcome(), Some("Bayern Munich"));

    let dict = oracle.get_dict();
    assert_eq!(dict["outcome"], "Bayern Munich");
    assert_eq!(dict["analysis"]["outcome"], "Bayern Munich");
    assert_eq!(
        dict["analysis"]["relevant_sources"],
        json!([MATCH_2024_10_09])
    );

    assert_eq!(fetcher.fetched(), vec![MATCH_2024_10_09]);
    let prompts = provider.prompts();
    assert!(prompts[0].contains("Bayern Munich 2 - 1 Arsenal"));
    assert!(prompts[1].contains("Bayern Munich 2-1 Arsenal, full time."));
}

#[tokio::test]
async fn outcome_outside_the_list_is_an_error() {
    let params = OracleParams::new(
        "unexpected_outcome_test",
        "Football Prediction Market - Unexpected Outcome Test",
        "Testing market behavior with unexpected draw outcome",
    )
    .outcomes(["Italy", "Belgium"])
    .rules(["The outcome is the result of the match"])
    .resolution_urls([MATCH_2024_10_10])
    .earliest_resolution_date("2024-01-01T00:00:00+00:00");
    let mut oracle = Oracle::deploy(params, "0xcreator").unwrap();

    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when(
                "<processed_data>",
                r#"{"relevant_sources": [], "reasoning": "The match ended 2-2.", "outcome": "Draw"}"#,
            )
            .reply_when(
                "<webpage_content>",
                r#"{"valid_source": true, "event_has_occurred": true, "reasoning": "Italy 2-2 Belgium", "outcome": "ERROR"}"#,
            ),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_10, "Italy 2 - 2 Belgium"));

    let report = runtime(provider, fetcher)
        .resolve(&mut oracle, None)
        .await
        .unwrap();

    assert_eq!(report.status, Status::Error);
    assert_eq!(oracle.get_status(), "Error");
    assert_eq!(oracle.outcome(), None);
    assert_eq!(oracle.get_dict()["analysis"]["outcome"], "Draw");
}

#[tokio::test]
async fn undetermined_keeps_oracle_open_for_retry() {
    let evidence = "https://bbc.com/sport/football/live/italy-belgium";
    let provider = Arc::new(
        ScriptedProvider::new()
            .replies_when(
                "<processed_data>",
                &[
                    r#"{"relevant_sources": [], "reasoning": "Kick-off has not happened.", "outcome": "UNDETERMINED"}"#,
                    r#"{"relevant_sources": [], "reasoning": "Italy won 1-0.", "outcome": "Italy"}"#,
                ],
            )
            .reply_when("<webpage_content>", r#"{"outcome": "UNDETERMINED"}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(evidence, "Italy v Belgium"));
    let runtime = runtime(provider, fetcher);

    let mut oracle = italy_belgium_by_domain();
    let first = runtime.resolve(&mut oracle, Some(evidence)).await.unwrap();
    assert_eq!(first.status, Status::Active);
    assert_eq!(oracle.outcome(), None);
    assert_eq!(
        oracle.analysis().and_then(|a| a.outcome()),
        Some("UNDETERMINED")
    );

    let second = runtime.resolve(&mut oracle, Some(evidence)).await.unwrap();
    assert_eq!(second.status, Status::Resolved);
    assert_eq!(oracle.outcome(), Some("Italy"));
}

#[tokio::test]
async fn evidence_from_unlisted_domain_is_rejected_before_any_io() {
    let provider = Arc::new(ScriptedProvider::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    let runtime = runtime(provider.clone(), fetcher.clone());

    let mut oracle = italy_belgium_by_domain();
    let before = oracle.clone();

    for url in ["https://www.espn.com/match", "https://sport.bbc.com/x", "not a url"] {
        let result = runtime.resolve(&mut oracle, Some(url)).await;
        assert!(matches!(
            result,
            Err(RuntimeError::State(StateError::EvidenceRejected(_)))
        ));
    }

    let result = runtime.resolve(&mut oracle, None).await;
    assert!(matches!(
        result,
        Err(RuntimeError::State(StateError::MissingEvidence))
    ));

    assert_eq!(oracle, before);
    assert_eq!(provider.calls(), 0);
    assert!(fetcher.fetched().is_empty());
}

#[tokio::test]
async fn resolving_before_the_earliest_date_fails() {
    let provider = Arc::new(ScriptedProvider::new());
    let fetcher = Arc::new(ScriptedFetcher::new());
    let early = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let runtime = runtime_with(provider.clone(), fetcher, RuntimeConfig::default(), early);

    let mut oracle = bayern_arsenal();
    let result = runtime.resolve(&mut oracle, None).await;

    assert!(matches!(
        result,
        Err(RuntimeError::State(StateError::TooEarly { .. }))
    ));
    assert_eq!(oracle.status(), Status::Active);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn terminal_oracle_cannot_be_resolved_again() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"outcome": "Arsenal"}"#)
            .reply_when("<webpage_content>", r#"{"outcome": "Arsenal"}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "Arsenal won"));
    let runtime = runtime(provider.clone(), fetcher);

    let mut oracle = bayern_arsenal();
    runtime.resolve(&mut oracle, None).await.unwrap();
    let calls = provider.calls();

    let result = runtime.resolve(&mut oracle, None).await;
    assert!(matches!(
        result,
        Err(RuntimeError::State(StateError::NotActive(Status::Resolved)))
    ));
    assert_eq!(provider.calls(), calls);
    assert_eq!(oracle.outcome(), Some("Arsenal"));
}

#[tokio::test]
async fn fetch_failure_aborts_without_state_change() {
    let provider = Arc::new(ScriptedProvider::new().reply_when("<", r#"{"outcome": "Arsenal"}"#));
    let fetcher = Arc::new(ScriptedFetcher::new().failing(
        MATCH_2024_10_09,
        FetchError::Status {
            url: MATCH_2024_10_09.to_string(),
            status: 503,
        },
    ));

    let mut oracle = bayern_arsenal();
    let before = oracle.clone();
    let result = runtime(provider.clone(), fetcher).resolve(&mut oracle, None).await;

    assert!(matches!(result, Err(RuntimeError::Fetch(_))));
    assert_eq!(oracle, before);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn validator_disagreement_aborts_without_state_change() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"outcome": "Arsenal"}"#)
            .replies_when(
                "<webpage_content>",
                &[
                    r#"{"outcome": "Arsenal"}"#,
                    r#"{"outcome": "Bayern Munich"}"#,
                    r#"{"outcome": "UNDETERMINED"}"#,
                ],
            ),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "conflicting reports"));
    let mut config = RuntimeConfig::default();
    config.consensus.validators = 3;

    let mut oracle = bayern_arsenal();
    let before = oracle.clone();
    let result = runtime_with(provider, fetcher, config, after_match())
        .resolve(&mut oracle, None)
        .await;

    assert!(matches!(
        result,
        Err(RuntimeError::NoConsensus {
            agreeing: 1,
            required: 2,
            validators: 3
        })
    ));
    assert_eq!(oracle, before);
}

#[tokio::test]
async fn state_survives_a_persistence_round_trip() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"reasoning": "2-1", "outcome": "Bayern Munich"}"#)
            .reply_when("<webpage_content>", r#"{"outcome": "Bayern Munich"}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "2-1"));

    let mut oracle = bayern_arsenal();
    runtime(provider, fetcher).resolve(&mut oracle, None).await.unwrap();

    let stored = serde_json::to_string(&oracle).unwrap();
    let restored: Oracle = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored.get_dict(), oracle.get_dict());
    assert_eq!(restored.get_status(), "Resolved");
}

#[tokio::test]
async fn error_oracle_rejects_further_resolution() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"reasoning": "2-2", "outcome": "Draw"}"#)
            .reply_when("<webpage_content>", r#"{"outcome": "ERROR"}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "2-2"));
    let runtime = runtime(provider.clone(), fetcher.clone());

    let mut oracle = bayern_arsenal();
    let report = runtime.resolve(&mut oracle, None).await.unwrap();
    assert_eq!(report.status, Status::Error);
    let calls = provider.calls();
    let after_first = oracle.clone();

    let result = runtime.resolve(&mut oracle, None).await;
    assert!(matches!(
        result,
        Err(RuntimeError::State(StateError::NotActive(Status::Error)))
    ));
    assert_eq!(oracle, after_first);
    assert_eq!(provider.calls(), calls);
    assert_eq!(fetcher.fetched().len(), 1);
}

#[tokio::test]
async fn wrongly_typed_outcome_closes_the_market_as_error() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"relevant_sources": [], "outcome": 2}"#)
            .reply_when("<webpage_content>", r#"{"outcome": 2}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "2-1"));

    let mut oracle = bayern_arsenal();
    let report = runtime(provider, fetcher)
        .resolve(&mut oracle, None)
        .await
        .unwrap();

    assert_eq!(report.status, Status::Error);
    assert_eq!(oracle.get_status(), "Error");
    assert_eq!(oracle.outcome(), None);
    assert_eq!(oracle.get_dict()["analysis"]["outcome"], json!(2));
}

#[tokio::test]
async fn wrongly_typed_side_fields_do_not_abort_resolution() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when(
                "<processed_data>",
                r#"{"relevant_sources": 7, "reasoning": ["2-2 draw", "not listed"], "outcome": "ERROR"}"#,
            )
            .reply_when(
                "<webpage_content>",
                r#"{"valid_source": "yes", "event_has_occurred": "probably", "reasoning": {"score": "2-2"}, "outcome": "ERROR"}"#,
            ),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "2-2"));

    let mut oracle = bayern_arsenal();
    let report = runtime(provider, fetcher)
        .resolve(&mut oracle, None)
        .await
        .unwrap();

    assert_eq!(report.sources[0].verdict.valid_source(), None);
    assert_eq!(report.sources[0].verdict.event_has_occurred(), None);
    assert!(report.analysis.relevant_sources().is_empty());
    assert_eq!(report.status, Status::Error);
    assert_eq!(oracle.get_status(), "Error");
}

#[tokio::test]
async fn provider_failure_aborts_without_state_change() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"outcome": "Arsenal"}"#)
            .fail_when("<webpage_content>", "connection reset by peer"),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(MATCH_2024_10_09, "Arsenal won"));

    let mut oracle = bayern_arsenal();
    let before = oracle.clone();
    let result = runtime(provider.clone(), fetcher.clone())
        .resolve(&mut oracle, None)
        .await;

    match result {
        Err(RuntimeError::Provider(ProviderError::Transport(msg))) => {
            assert_eq!(msg, "connection reset by peer")
        }
        other => panic!("expected a provider error, got {:?}", other),
    }
    assert_eq!(oracle, before);
    assert_eq!(provider.calls(), 1);
    assert_eq!(fetcher.fetched(), vec![MATCH_2024_10_09]);
}

#[tokio::test]
async fn report_carries_the_evidence_url() {
    let evidence = "https://bbc.com/sport/football/live/italy-belgium";
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply_when("<processed_data>", r#"{"outcome": "Belgium"}"#)
            .reply_when("<webpage_content>", r#"{"outcome": "Belgium"}"#),
    );
    let fetcher = Arc::new(ScriptedFetcher::new().page(evidence, "Belgium won 1-0"));

    let mut oracle = italy_belgium_by_domain();
    let report = runtime(provider, fetcher)
        .resolve(&mut oracle, Some(evidence))
        .await
        .unwrap();

    assert_eq!(report.evidence_url.as_deref(), Some(evidence));
    assert_eq!(report.sources[0].source_url, evidence);
    assert_eq!(oracle.outcome(), Some("Belgium"));
}
