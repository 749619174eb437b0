//! Usage accounting for one resolution attempt.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::providers::TokenUsage;

/// Accumulated collaborator usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of LLM calls made, across all validators
    pub llm_calls: u32,

    pub prompt_tokens: u32,

    pub completion_tokens: u32,

    /// Number of evidence pages fetched
    pub fetches: u32,

    /// Characters of evidence text forwarded to prompts
    pub evidence_chars: u64,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Thread-safe usage tracker shared by concurrent validator runs.
#[derive(Debug, Default)]
pub struct UsageTracker {
    usage: Mutex<Usage>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completion.
    pub fn record_completion(&self, tokens: &TokenUsage) {
        let mut usage = self.usage.lock();
        usage.llm_calls += 1;
        usage.prompt_tokens += tokens.input_tokens;
        usage.completion_tokens += tokens.output_tokens;
    }

    /// Record one fetched page of `chars` characters.
    pub fn record_fetch(&self, chars: usize) {
        let mut usage = self.usage.lock();
        usage.fetches += 1;
        usage.evidence_chars += chars as u64;
    }

    /// Current totals.
    pub fn snapshot(&self) -> Usage {
        self.usage.lock().clone()
    }
}
