//! Runtime orchestrator for one `resolve` call.
//!
//! Execution flow:
//! 1. Check preconditions on the oracle (deterministic, no I/O)
//! 2. Phase 1: evaluate each source through the adjudicator, in source order
//! 3. Phase 2: aggregate the per-source verdicts through the adjudicator
//! 4. Apply the final verdict to the oracle
//!
//! The oracle is written only in step 4. Any error before that leaves it
//! exactly as it was.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use oracle_core::{Oracle, SourceVerdict, Status, Verdict};

use crate::aggregator::Aggregator;
use crate::config::{Evaluation, RuntimeConfig};
use crate::consensus::{Adjudicator, SingleValidator, ValidatorQuorum};
use crate::evidence::EvidenceFetcher;
use crate::providers::LlmProvider;
use crate::resolver::SourceResolver;
use crate::usage::{Usage, UsageTracker};
use crate::RuntimeError;

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Result of a successful `resolve`.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    /// Status after the call
    pub status: Status,

    pub outcome: Option<String>,

    /// Caller-supplied evidence URL (domain allow-list oracles only)
    pub evidence_url: Option<String>,

    /// Per-source verdicts, in source order
    pub sources: Vec<SourceVerdict>,

    /// The final verdict, now stored as the oracle's `analysis`
    pub analysis: Verdict,

    pub usage: Usage,

    /// Time shown to the model as the current date
    pub resolved_at: DateTime<Utc>,
}

/// Drives resolution of oracles against real or scripted collaborators.
pub struct OracleRuntime {
    provider: Arc<dyn LlmProvider>,
    fetcher: Arc<dyn EvidenceFetcher>,
    adjudicator: Arc<dyn Adjudicator>,
    config: RuntimeConfig,
    clock: Clock,
}

impl std::fmt::Debug for OracleRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleRuntime")
            .field("provider", &self.provider.name())
            .field("fetcher", &self.fetcher.name())
            .field("adjudicator", &self.adjudicator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl OracleRuntime {
    pub fn builder() -> OracleRuntimeBuilder {
        OracleRuntimeBuilder::default()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Resolve `oracle`, optionally with a caller-supplied evidence URL.
    pub async fn resolve(
        &self,
        oracle: &mut Oracle,
        evidence_url: Option<&str>,
    ) -> Result<ResolutionReport, RuntimeError> {
        let now = (self.clock)();
        let plan = oracle.plan_resolution(now, evidence_url)?;

        let span = info_span!("resolve", market = %oracle.prediction_market_id());
        let usage = UsageTracker::new();

        let (sources, analysis) = self
            .evaluate(oracle, &plan.sources, now, &usage)
            .instrument(span)
            .await?;

        let determination = oracle.apply_verdict(analysis.clone())?;

        info!(
            market = %oracle.prediction_market_id(),
            status = %determination.status(),
            outcome = determination.outcome().unwrap_or("<none>"),
            "Resolution applied"
        );

        Ok(ResolutionReport {
            status: oracle.status(),
            outcome: oracle.outcome().map(str::to_string),
            evidence_url: plan.evidence_url,
            sources,
            analysis,
            usage: usage.snapshot(),
            resolved_at: now,
        })
    }

    async fn evaluate(
        &self,
        oracle: &Oracle,
        sources: &[String],
        now: DateTime<Utc>,
        usage: &UsageTracker,
    ) -> Result<(Vec<SourceVerdict>, Verdict), RuntimeError> {
        let resolver = SourceResolver {
            provider: self.provider.as_ref(),
            fetcher: self.fetcher.as_ref(),
            adjudicator: self.adjudicator.as_ref(),
            completion: &self.config.completion,
            usage,
            max_content_chars: self.config.fetch.max_content_chars,
        };

        info!(
            sources = sources.len(),
            mode = ?self.config.evaluation,
            adjudicator = self.adjudicator.name(),
            "Phase 1: evaluating sources"
        );

        let verdicts = match self.config.evaluation {
            Evaluation::Sequential => {
                let mut verdicts = Vec::with_capacity(sources.len());
                for url in sources {
                    verdicts.push(resolver.resolve(oracle, url, now).await?);
                }
                verdicts
            }
            Evaluation::Concurrent => {
                try_join_all(sources.iter().map(|url| resolver.resolve(oracle, url, now))).await?
            }
        };

        info!(sources = verdicts.len(), "Phase 2: aggregating");

        let aggregator = Aggregator {
            provider: self.provider.as_ref(),
            adjudicator: self.adjudicator.as_ref(),
            completion: &self.config.completion,
            usage,
        };
        let analysis = aggregator.aggregate(oracle, &verdicts, now).await?;

        Ok((verdicts, analysis))
    }
}

/// Builder for [`OracleRuntime`].
#[derive(Default)]
pub struct OracleRuntimeBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    fetcher: Option<Arc<dyn EvidenceFetcher>>,
    adjudicator: Option<Arc<dyn Adjudicator>>,
    config: RuntimeConfig,
    clock: Option<Clock>,
}

impl OracleRuntimeBuilder {
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn EvidenceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Override the adjudicator derived from `config.consensus`.
    pub fn adjudicator(mut self, adjudicator: Arc<dyn Adjudicator>) -> Self {
        self.adjudicator = Some(adjudicator);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Pin the clock to `now`.
    pub fn fixed_time(self, now: DateTime<Utc>) -> Self {
        self.clock(move || now)
    }

    pub fn build(self) -> Result<OracleRuntime, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::NotConfigured("LLM provider".to_string()))?;
        let fetcher = self
            .fetcher
            .ok_or_else(|| RuntimeError::NotConfigured("evidence fetcher".to_string()))?;

        let consensus = &self.config.consensus;
        let adjudicator: Arc<dyn Adjudicator> = match self.adjudicator {
            Some(adjudicator) => adjudicator,
            None if consensus.validators <= 1 => Arc::new(SingleValidator),
            None => Arc::new(ValidatorQuorum::new(
                consensus.validators,
                consensus.required(),
            )),
        };
        let clock: Clock = match self.clock {
            Some(clock) => clock,
            None => Arc::new(Utc::now),
        };

        Ok(OracleRuntime {
            provider,
            fetcher,
            adjudicator,
            config: self.config,
            clock,
        })
    }
}
