use crate::types::{FeedError, FetchConfig, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a document body as text, retrying transport errors and server
    /// errors with exponential backoff. Client errors fail immediately.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching {}", url);

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.timeout_seconds * 4)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.fetch_once(url).await {
                Ok(content) => {
                    info!(
                        "Fetched {} ({} bytes, {} ms)",
                        url,
                        content.len(),
                        start_time.elapsed().as_millis()
                    );
                    return Ok(content);
                }
                Err(e) => {
                    let retryable = is_retryable(&e);
                    last_error = Some(e);

                    if retryable && attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                    break;
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        error!("Failed to fetch {} after {} attempts: {}", url, self.config.max_retries + 1, reason);

        Err(FeedError::Network {
            url: url.to_string(),
            reason,
        })
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let max_bytes = self.config.max_document_bytes();
        if let Some(content_length) = response.content_length() {
            if exceeds_size_cap(content_length, max_bytes) {
                return Err(too_large(url, content_length));
            }
        }

        // Compressed responses may omit Content-Length, so check the body too.
        let body = response.bytes().await?;
        if exceeds_size_cap(body.len() as u64, max_bytes) {
            return Err(too_large(url, body.len() as u64));
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Transport failures, rate limiting and server errors are worth another
/// attempt; anything else will fail the same way again.
pub fn is_retryable(error: &FeedError) -> bool {
    match error {
        FeedError::Http(_) => true,
        FeedError::Status { status, .. } => *status >= 500 || *status == 429,
        _ => false,
    }
}

pub fn exceeds_size_cap(len: u64, max_bytes: u64) -> bool {
    len > max_bytes
}

fn too_large(url: &str, len: u64) -> FeedError {
    FeedError::Network {
        url: url.to_string(),
        reason: format!("Document too large: {} bytes", len),
    }
}
