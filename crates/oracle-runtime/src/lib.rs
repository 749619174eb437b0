//! # oracle-runtime
//!
//! Async resolution runtime for intelligent oracles.
//!
//! `oracle-core` decides *whether* an oracle may be resolved and *what* a
//! final verdict means. This crate does the non-deterministic part in
//! between: fetching evidence, prompting the model, and settling each step
//! across validators through an [`Adjudicator`].
//!
//! ## Features
//!
//! - `anthropic`: Anthropic Messages API provider
//! - `web`: HTTP evidence fetcher
//! - `testing`: scripted provider and fetcher for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use oracle_runtime::{AnthropicProvider, HttpFetcher, OracleRuntime, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_file("runtime.yaml")?;
//! let runtime = OracleRuntime::builder()
//!     .provider(Arc::new(AnthropicProvider::from_settings(&config.provider)?))
//!     .fetcher(Arc::new(HttpFetcher::new(config.fetch.clone())?))
//!     .config(config)
//!     .build()?;
//!
//! let report = runtime.resolve(&mut oracle, None).await?;
//! println!("{} {:?}", report.status, report.outcome);
//! ```

use thiserror::Error;

use oracle_core::{SanitizeError, StateError};

pub mod aggregator;
pub mod config;
pub mod consensus;
pub mod evidence;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod resolver;
pub mod usage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ConfigError, ConsensusSettings, Evaluation, FetchSettings, RuntimeConfig};
pub use consensus::{Adjudicator, Principle, ProducingStep, SingleValidator, ValidatorQuorum};
pub use evidence::{EvidenceFetcher, FetchError};
pub use orchestrator::{OracleRuntime, OracleRuntimeBuilder, ResolutionReport};
pub use providers::{CompletionConfig, LlmProvider, ProviderError};
pub use usage::{Usage, UsageTracker};

#[cfg(feature = "anthropic")]
pub use providers::AnthropicProvider;

#[cfg(feature = "web")]
pub use evidence::HttpFetcher;

/// Errors from a resolution attempt.
///
/// Every variant leaves the oracle unchanged.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("Evidence fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("LLM call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Could not use model output: {0}")]
    Sanitize(#[from] SanitizeError),

    #[error("No consensus: {agreeing} of {validators} validators agreed, {required} required")]
    NoConsensus {
        agreeing: usize,
        required: usize,
        validators: usize,
    },

    #[error("Runtime not configured: missing {0}")]
    NotConfigured(String),
}
