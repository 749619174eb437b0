//! HTTP evidence fetcher.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, warn};

use super::{extract_text, truncate_chars, EvidenceFetcher, FetchError};
use crate::config::FetchSettings;

/// Fetches pages over HTTP and reduces them to readable text.
///
/// Transient failures (timeouts, connection errors, 5xx, 429) are retried
/// with exponential backoff. The text is cut to `max_content_chars`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(settings.max_redirects))
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Request {
                url: String::new(),
                message: format!("client init failed: {}", e),
            })?;

        Ok(Self { client, settings })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout { url: url.to_string() }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl EvidenceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(250))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(self.settings.retries);

        let body = (|| self.fetch_once(url))
            .retry(backoff)
            .when(FetchError::is_transient)
            .notify(|err: &FetchError, after: Duration| {
                warn!(url, error = %err, retry_in = ?after, "Evidence fetch failed, retrying");
            })
            .await?;

        let text = extract_text(&body);
        let text = truncate_chars(&text, self.settings.max_content_chars);
        debug!(url, bytes = body.len(), chars = text.chars().count(), "Evidence fetched");

        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "http"
    }
}
