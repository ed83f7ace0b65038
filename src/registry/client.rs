//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries)
//! - Rate limit error handling

use crate::error::RegistryError;
use crate::registry::DocumentFetcher;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("drupal-security-advisories/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Perform a GET request with retry logic
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            debug!(url, attempt, "GET");
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(RegistryError::RateLimitExceeded {
                            url: url.to_string(),
                        });

                        if attempt < self.max_retries {
                            warn!(url, delay_ms = delay, "rate limited, backing off");
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                            delay *= 2;
                            continue;
                        }
                        break;
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(RegistryError::not_found(url));
                    }

                    if !status.is_success() {
                        return Err(RegistryError::network_error(url, format!("HTTP {}", status)));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(if e.is_timeout() {
                        RegistryError::timeout(url)
                    } else {
                        RegistryError::network_error(url, e.to_string())
                    });

                    if attempt < self.max_retries {
                        warn!(url, error = %e, delay_ms = delay, "request failed, retrying");
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RegistryError::network_error(url, "unknown error")))
    }

    /// Perform a GET request and get the body as text, retrying broken bodies
    pub async fn get_text(&self, url: &str) -> Result<String, RegistryError> {
        let mut last_error = None;
        let mut delay = BASE_DELAY_MS;

        for attempt in 0..=self.max_retries {
            // Transport errors are already retried in `get`.
            let response = self.get(url).await?;

            match response.text().await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    last_error = Some(RegistryError::invalid_response(
                        url,
                        format!("failed to read response body: {}", e),
                    ));

                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| RegistryError::invalid_response(url, "unknown body read error")))
    }
}

#[async_trait]
impl DocumentFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, RegistryError> {
        self.get_text(url).await
    }
}
