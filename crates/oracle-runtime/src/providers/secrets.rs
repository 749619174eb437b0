//! API key handling.
//!
//! Keys are wrapped in a `SecretString` the moment they are read. Neither
//! `Debug` nor `Display` shows the value; [`ApiCredential::expose`] is the
//! only way out, called where the request header is set.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a key came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `provider.api_key` in the runtime config
    Config,
    /// The named environment variable
    Env(&'static str),
    /// Passed in code
    Inline,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => f.write_str("config"),
            CredentialSource::Env(var) => write!(f, "${}", var),
            CredentialSource::Inline => f.write_str("inline"),
        }
    }
}

pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
        }
    }

    pub fn from_env(var: &'static str) -> Result<Self, ProviderError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => {
                Ok(Self::new(value.trim(), CredentialSource::Env(var)))
            }
            _ => Err(ProviderError::NotConfigured(format!(
                "no API key: set provider.api_key or ${}",
                var
            ))),
        }
    }

    /// A non-blank configured key wins over the environment.
    pub fn resolve(configured: Option<&str>, var: &'static str) -> Result<Self, ProviderError> {
        match configured.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Ok(Self::new(value, CredentialSource::Config)),
            None => Self::from_env(var),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED] ({})", self.source)
    }
}
