//! Meraki Dashboard API client
//!
//! Thin async client with bearer authentication and retry for transient
//! failures (429 rate limits, 5xx responses, connection errors).

pub mod organizations;

use crate::error::{first_error_message, CotermError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DASHBOARD_API_BASE: &str = "https://api.meraki.com/api/v1";

/// Default retry configuration
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 1000;
const MAX_BACKOFF_MS: u64 = 30000;
const JITTER_FACTOR: f64 = 0.3; // +/- 30% jitter

/// Calculate backoff with jitter for exponential backoff
fn calculate_backoff_with_jitter(attempt: u32) -> Duration {
    let base_backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt);
    let capped_backoff = base_backoff.min(MAX_BACKOFF_MS);

    // Add jitter (+/- JITTER_FACTOR)
    let jitter_range = (capped_backoff as f64 * JITTER_FACTOR) as u64;
    let jitter = if jitter_range > 0 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        std::time::SystemTime::now().hash(&mut hasher);
        (hasher.finish() % (jitter_range * 2)) as i64 - jitter_range as i64
    } else {
        0
    };

    let final_backoff = (capped_backoff as i64 + jitter).max(100) as u64;
    Duration::from_millis(final_backoff)
}

/// Dashboard API client with retry support
pub struct DashboardClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DashboardClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DASHBOARD_API_BASE.to_string())
    }

    /// Point the client at a different base URL. The integration tests use
    /// this to run against a local mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
        }
    }

    /// Make a GET request to the Dashboard API with retry for transient failures
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    // Retry on 429 (rate limit) or 5xx (server errors)
                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_secs(&resp);
                        eprintln!(
                            "Rate limited (429). Retrying in {} seconds... (attempt {}/{})",
                            retry_after,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }

                    if status.is_server_error() && attempt < MAX_RETRIES - 1 {
                        let wait_time = calculate_backoff_with_jitter(attempt);
                        eprintln!(
                            "Server error ({}). Retrying in {:?}... (attempt {}/{})",
                            status,
                            wait_time,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(wait_time).await;
                        continue;
                    }

                    if !status.is_success() {
                        let error_text = resp.text().await.unwrap_or_default();
                        return Err(CotermError::Api {
                            status,
                            message: first_error_message(&error_text),
                        });
                    }

                    let data = resp.json::<T>().await?;
                    return Ok(data);
                }
                Err(e) => {
                    // Retry on connection errors
                    if attempt < MAX_RETRIES - 1 {
                        let wait_time = calculate_backoff_with_jitter(attempt);
                        eprintln!(
                            "Connection error: {}. Retrying in {:?}... (attempt {}/{})",
                            e,
                            wait_time,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(wait_time).await;
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error
            .map(|e| e.into())
            .unwrap_or(CotermError::RetriesExhausted {
                method: "GET",
                url,
                retries: MAX_RETRIES,
            }))
    }

    /// Make a POST request to the Dashboard API with retry for transient failures
    pub async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<R> {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = retry_after_secs(&resp);
                        eprintln!(
                            "Rate limited (429). Retrying in {} seconds... (attempt {}/{})",
                            retry_after,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }

                    if status.is_server_error() && attempt < MAX_RETRIES - 1 {
                        let wait_time = calculate_backoff_with_jitter(attempt);
                        eprintln!(
                            "Server error ({}). Retrying in {:?}... (attempt {}/{})",
                            status,
                            wait_time,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(wait_time).await;
                        continue;
                    }

                    if !status.is_success() {
                        let error_text = resp.text().await.unwrap_or_default();
                        return Err(CotermError::Api {
                            status,
                            message: first_error_message(&error_text),
                        });
                    }

                    let data = resp.json::<R>().await?;
                    return Ok(data);
                }
                Err(e) => {
                    if attempt < MAX_RETRIES - 1 {
                        let wait_time = calculate_backoff_with_jitter(attempt);
                        eprintln!(
                            "Connection error: {}. Retrying in {:?}... (attempt {}/{})",
                            e,
                            wait_time,
                            attempt + 1,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(wait_time).await;
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error
            .map(|e| e.into())
            .unwrap_or(CotermError::RetriesExhausted {
                method: "POST",
                url,
                retries: MAX_RETRIES,
            }))
    }
}

/// Seconds to wait from a 429 response's Retry-After header
fn retry_after_secs(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(INITIAL_BACKOFF_MS / 1000)
}
