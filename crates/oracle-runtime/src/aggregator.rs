//! Phase 2: reconcile per-source verdicts into one final verdict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use oracle_core::{Oracle, SourceVerdict, Verdict, VerdictKind};

use crate::consensus::{Adjudicator, Principle, ProducingStep};
use crate::prompts::aggregate_prompt;
use crate::providers::{CompletionConfig, LlmProvider};
use crate::resolver::ask;
use crate::usage::UsageTracker;
use crate::RuntimeError;

struct AggregateStep<'a> {
    aggregator: &'a Aggregator<'a>,
    prompt: String,
}

#[async_trait]
impl ProducingStep for AggregateStep<'_> {
    async fn produce(&self) -> Result<String, RuntimeError> {
        let a = self.aggregator;
        ask(a.provider, a.completion, a.usage, self.prompt.clone()).await
    }
}

/// Produces the final verdict from the ordered per-source verdicts.
pub struct Aggregator<'a> {
    pub(crate) provider: &'a dyn LlmProvider,
    pub(crate) adjudicator: &'a dyn Adjudicator,
    pub(crate) completion: &'a CompletionConfig,
    pub(crate) usage: &'a UsageTracker,
}

impl<'a> Aggregator<'a> {
    pub async fn aggregate(
        &self,
        oracle: &Oracle,
        verdicts: &[SourceVerdict],
        now: DateTime<Utc>,
    ) -> Result<Verdict, RuntimeError> {
        let step = AggregateStep {
            aggregator: self,
            prompt: aggregate_prompt(oracle, verdicts, now),
        };

        let raw = self
            .adjudicator
            .run_comparative(&step, &Principle::outcome_exact())
            .await?;
        let verdict = Verdict::parse(&raw, VerdictKind::Aggregate)?;

        info!(
            sources = verdicts.len(),
            outcome = verdict.outcome().unwrap_or("<none>"),
            "Sources aggregated"
        );

        Ok(verdict)
    }
}
