//! Scripted collaborators for tests.
//!
//! ```rust,ignore
//! let provider = ScriptedProvider::new()
//!     .reply_when("<webpage_content>", r#"{"outcome": "Arsenal"}"#)
//!     .reply_when("<processed_data>", r#"{"outcome": "Arsenal"}"#);
//! let fetcher = ScriptedFetcher::new().page("https://bbc.com/x", "Arsenal won");
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::evidence::{EvidenceFetcher, FetchError};
use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

struct Rule {
    needle: String,
    replies: Vec<Result<String, String>>,
    served: usize,
}

/// Replies to prompts by substring match.
///
/// The first rule whose needle appears in the last message answers. A rule
/// with several replies hands them out in order and then repeats its last.
#[derive(Default)]
pub struct ScriptedProvider {
    rules: Mutex<Vec<Rule>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, needle: &str, replies: Vec<Result<String, String>>) -> Self {
        self.rules.lock().push(Rule {
            needle: needle.to_string(),
            replies,
            served: 0,
        });
        self
    }

    /// Always answer `reply` to prompts containing `needle`.
    pub fn reply_when(self, needle: &str, reply: &str) -> Self {
        self.push(needle, vec![Ok(reply.to_string())])
    }

    /// Answer prompts containing `needle` with `replies` in order.
    pub fn replies_when(self, needle: &str, replies: &[&str]) -> Self {
        let replies = replies.iter().map(|r| Ok(r.to_string())).collect();
        self.push(needle, replies)
    }

    /// Fail prompts containing `needle` with a transport error carrying
    /// `message`.
    pub fn fail_when(self, needle: &str, message: &str) -> Self {
        self.push(needle, vec![Err(message.to_string())])
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
        self.prompts.lock().push(prompt.clone());

        let reply = {
            let mut rules = self.rules.lock();
            let rule = rules
                .iter_mut()
                .find(|r| prompt.contains(&r.needle))
                .ok_or_else(|| ProviderError::NotConfigured("no scripted reply".to_string()))?;
            let idx = rule.served.min(rule.replies.len().saturating_sub(1));
            rule.served += 1;
            rule.replies
                .get(idx)
                .cloned()
                .unwrap_or_else(|| Err("rule has no replies".to_string()))
        };

        let content = reply.map_err(ProviderError::Transport)?;
        Ok(CompletionResponse {
            usage: TokenUsage {
                input_tokens: self.estimate_tokens(&prompt),
                output_tokens: self.estimate_tokens(&content),
            },
            content,
            model: config.model.clone(),
            stop_reason: Some("end_turn".to_string()),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Serves fixed page text per URL; unknown URLs are a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<String, FetchError>>,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(text.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    /// Every URL fetched, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().clone()
    }
}

#[async_trait]
impl EvidenceFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetched.lock().push(url.to_string());
        match self.pages.get(url) {
            Some(result) => result.clone(),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
