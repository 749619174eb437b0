//! Phase 1: one verdict per evidence source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use oracle_core::{Oracle, SourceVerdict, Verdict, VerdictKind};

use crate::consensus::{Adjudicator, Principle, ProducingStep};
use crate::evidence::{truncate_chars, EvidenceFetcher};
use crate::prompts::{source_prompt, SYSTEM_PROMPT};
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::usage::UsageTracker;
use crate::RuntimeError;

/// Ask the model once and record its usage.
pub(crate) async fn ask(
    provider: &dyn LlmProvider,
    completion: &CompletionConfig,
    usage: &UsageTracker,
    prompt: String,
) -> Result<String, RuntimeError> {
    debug!(
        provider = provider.name(),
        prompt_chars = prompt.len(),
        est_tokens = provider.estimate_tokens(&prompt),
        "Calling model"
    );
    let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
    let response = provider.complete(messages, completion).await?;
    usage.record_completion(&response.usage);
    Ok(response.content)
}

/// What each validator runs for one source: fetch, prompt, complete.
struct SourceStep<'a> {
    resolver: &'a SourceResolver<'a>,
    oracle: &'a Oracle,
    source_url: &'a str,
    now: DateTime<Utc>,
}

#[async_trait]
impl ProducingStep for SourceStep<'_> {
    async fn produce(&self) -> Result<String, RuntimeError> {
        let r = self.resolver;
        let page = r.fetcher.fetch(self.source_url).await?;
        let content = truncate_chars(&page, r.max_content_chars);
        r.usage.record_fetch(content.chars().count());

        let prompt = source_prompt(self.oracle, self.source_url, content, self.now);
        ask(r.provider, r.completion, r.usage, prompt).await
    }
}

/// Evaluates evidence sources one at a time.
pub struct SourceResolver<'a> {
    pub(crate) provider: &'a dyn LlmProvider,
    pub(crate) fetcher: &'a dyn EvidenceFetcher,
    pub(crate) adjudicator: &'a dyn Adjudicator,
    pub(crate) completion: &'a CompletionConfig,
    pub(crate) usage: &'a UsageTracker,
    pub(crate) max_content_chars: usize,
}

impl<'a> SourceResolver<'a> {
    /// Produce the agreed verdict for one source.
    pub async fn resolve(
        &self,
        oracle: &Oracle,
        source_url: &str,
        now: DateTime<Utc>,
    ) -> Result<SourceVerdict, RuntimeError> {
        let step = SourceStep {
            resolver: self,
            oracle,
            source_url,
            now,
        };

        let raw = self
            .adjudicator
            .run_comparative(&step, &Principle::outcome_exact())
            .await?;
        let verdict = Verdict::parse(&raw, VerdictKind::Source)?;

        info!(
            source = source_url,
            outcome = verdict.outcome().unwrap_or("<none>"),
            valid_source = ?verdict.valid_source(),
            "Source evaluated"
        );

        Ok(SourceVerdict::new(source_url, verdict))
    }
}
