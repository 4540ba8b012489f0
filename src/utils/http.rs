// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body, treating non-success statuses as errors.
pub async fn fetch_page_async(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Fetch a page, retrying transient failures with exponential backoff.
///
/// Client errors (4xx) are not retried. The final failure is reported as
/// `SourceFetch`.
pub async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    config: &FetcherConfig,
) -> Result<String> {
    let mut backoff = Duration::from_millis(config.initial_backoff_ms);
    let max_backoff = Duration::from_millis(config.max_backoff_ms);
    let mut last_error = String::new();

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            log::warn!(
                "Retry {}/{} for {} in {:?}",
                attempt,
                config.max_retries,
                url,
                backoff
            );
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(max_backoff);
        }

        match fetch_page_async(client, url).await {
            Ok(body) => return Ok(body),
            Err(AppError::Http(e)) if e.status().is_some_and(|s| s.is_client_error()) => {
                return Err(AppError::source_fetch(e));
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(AppError::source_fetch(format!(
        "{url}: giving up after {} attempts: {last_error}",
        config.max_retries + 1
    )))
}
