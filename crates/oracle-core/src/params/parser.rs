//! Parameter parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading parameters.
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Failed to read parameters file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Constructor arguments for an oracle.
///
/// Every field defaults to empty so that a missing field surfaces as a
/// validation error from `Oracle::deploy` rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OracleParams {
    /// Identifier used to report back to the prediction market
    #[serde(default)]
    pub prediction_market_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Allowed outcomes, in display order
    #[serde(default)]
    pub potential_outcomes: Vec<String>,

    /// Natural-language resolution rules
    #[serde(default)]
    pub rules: Vec<String>,

    /// Allow-listed evidence domains (domain allow-list mode)
    #[serde(default)]
    pub data_source_domains: Vec<String>,

    /// Fixed evidence URLs (fixed-source mode)
    #[serde(default)]
    pub resolution_urls: Vec<String>,

    /// ISO-8601 timestamp; UTC when no offset is given
    #[serde(default)]
    pub earliest_resolution_date: String,
}

impl OracleParams {
    /// Start parameters for a market.
    pub fn new(
        prediction_market_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            prediction_market_id: prediction_market_id.into(),
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Set the potential outcomes.
    pub fn outcomes<I, S>(mut self, outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.potential_outcomes = outcomes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the resolution rules.
    pub fn rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules = rules.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fixed resolution URLs.
    pub fn resolution_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolution_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Set the allow-listed evidence domains.
    pub fn data_source_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_source_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Set the earliest resolution date.
    pub fn earliest_resolution_date(mut self, date: impl Into<String>) -> Self {
        self.earliest_resolution_date = date.into();
        self
    }

    /// Parse parameters from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ParamsError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse parameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse parameters from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse parameters from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a file, picking the format from its extension (`.json` or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }
}
