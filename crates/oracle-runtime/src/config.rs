//! Runtime configuration.
//!
//! Loaded from YAML or JSON. Durations are human-readable strings such as
//! `"30s"` or `"1m 30s"`.
//!
//! ```yaml
//! completion:
//!   model: claude-sonnet-4-5-20250514
//!   max_tokens: 1024
//!   timeout: 60s
//! fetch:
//!   timeout: 20s
//!   retries: 3
//!   max_content_chars: 40000
//! evaluation: concurrent
//! consensus:
//!   validators: 5
//!   quorum: 3
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;

/// Errors from loading runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Serde adapter for `humantime` duration strings.
pub(crate) mod duration_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(D::Error::custom)
    }
}

/// How Phase 1 walks the evidence sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// One source at a time, in order
    #[default]
    Sequential,

    /// All sources at once; results are still combined in source order
    Concurrent,
}

/// Settings for the HTTP evidence fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(with = "duration_str")]
    pub timeout: Duration,

    /// Extra attempts after a transient failure
    pub retries: usize,

    pub user_agent: String,

    pub max_redirects: usize,

    /// Page text beyond this many characters is dropped before prompting
    pub max_content_chars: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retries: 2,
            user_agent: concat!("intelligent-oracle/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 5,
            max_content_chars: 40_000,
        }
    }
}

/// How many validators replicate each prompt step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusSettings {
    pub validators: usize,

    /// Validators (leader included) that must agree; majority when unset
    pub quorum: Option<usize>,
}

impl Default for ConsensusSettings {
    fn default() -> Self {
        Self {
            validators: 1,
            quorum: None,
        }
    }
}

impl ConsensusSettings {
    /// The effective quorum.
    pub fn required(&self) -> usize {
        self.quorum.unwrap_or(self.validators / 2 + 1)
    }
}

/// Credentials and endpoint for the LLM provider.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Falls back to `ANTHROPIC_API_KEY` when unset
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for [`OracleRuntime`](crate::OracleRuntime).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub provider: ProviderSettings,
    pub completion: CompletionConfig,
    pub fetch: FetchSettings,
    pub evaluation: Evaluation,
    pub consensus: ConsensusSettings,
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a file, picking the format from its extension (`.json` or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let consensus = &self.consensus;
        if consensus.validators == 0 {
            return Err(ConfigError::Invalid("consensus.validators must be at least 1".into()));
        }
        let required = consensus.required();
        if required == 0 || required > consensus.validators {
            return Err(ConfigError::Invalid(format!(
                "consensus.quorum must be between 1 and {}, got {}",
                consensus.validators, required
            )));
        }
        if self.completion.max_tokens == 0 {
            return Err(ConfigError::Invalid("completion.max_tokens must be positive".into()));
        }
        Ok(())
    }
}
