use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use gw_core::{Error, Result};
use reqwest::StatusCode;

/// Seam for anything that can turn a URL into HTML. The pipeline depends on
/// this rather than on the concrete client so stages are testable offline.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("ghostwriter/{}", env!("CARGO_PKG_VERSION")),
            base_delay: Duration::from_millis(500),
            max_attempts: 3,
        }
    }
}

/// How a single failed attempt should be handled by the retry loop.
#[derive(Debug)]
pub(crate) enum AttemptError {
    /// Non-transient; fail immediately without retrying.
    Fatal(String),
    /// Worth retrying after a backoff.
    Transient(String),
}

pub struct Fetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client, options })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(FetchOptions::default())
    }

    /// Retrieves the body of `url`, retrying transient failures with a
    /// linearly increasing backoff. Client errors other than 429 on the
    /// final (post-redirect) status fail on the first attempt.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let client = &self.client;
        with_retries(url, self.options.max_attempts, self.options.base_delay, || async move {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| AttemptError::Transient(e.to_string()))?;
            let status = response.status();
            if status.is_success() {
                response
                    .text()
                    .await
                    .map_err(|e| AttemptError::Transient(e.to_string()))
            } else if is_fatal_status(status) {
                Err(AttemptError::Fatal(format!("HTTP {}", status)))
            } else {
                Err(AttemptError::Transient(format!("HTTP {}", status)))
            }
        })
        .await
    }
}

#[async_trait]
impl PageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Fetcher::fetch(self, url).await
    }
}

/// 4xx responses are non-transient, with the exception of 429 which signals
/// rate limiting and is worth backing off on.
pub(crate) fn is_fatal_status(status: StatusCode) -> bool {
    status.is_client_error() && status != StatusCode::TOO_MANY_REQUESTS
}

pub(crate) async fn with_retries<F, Fut>(
    url: &str,
    max_attempts: u32,
    base_delay: Duration,
    mut attempt_fn: F,
) -> Result<String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<String, AttemptError>>,
{
    let mut last_message = String::new();
    for attempt in 1..=max_attempts {
        match attempt_fn().await {
            Ok(body) => return Ok(body),
            Err(AttemptError::Fatal(message)) => {
                return Err(Error::Fetch {
                    url: url.to_string(),
                    message,
                })
            }
            Err(AttemptError::Transient(message)) => {
                tracing::debug!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt,
                    max_attempts,
                    url,
                    message
                );
                last_message = message;
                if attempt < max_attempts {
                    tokio::time::sleep(base_delay * attempt).await;
                }
            }
        }
    }
    Err(Error::Fetch {
        url: url.to_string(),
        message: last_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    const TINY: Duration = Duration::from_millis(1);

    #[test]
    fn test_status_classification() {
        assert!(is_fatal_status(StatusCode::NOT_FOUND));
        assert!(is_fatal_status(StatusCode::FORBIDDEN));
        assert!(!is_fatal_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_fatal_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_fatal_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_fatal_status(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_fatal_error_fails_on_first_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result = with_retries("http://test.com/missing", 3, TINY, || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Fatal("HTTP 404 Not Found".to_string()))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_error_exhausts_all_attempts() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result = with_retries("http://test.com/flaky", 3, TINY, || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(AttemptError::Transient("HTTP 503 Service Unavailable".to_string()))
            }
        })
        .await;
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            Error::Fetch { url, message } => {
                assert_eq!(url, "http://test.com/flaky");
                assert!(message.contains("503"));
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();
        let result = with_retries("http://test.com/", 3, TINY, || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 1 {
                    Err(AttemptError::Transient("timed out".to_string()))
                } else {
                    Ok("<html></html>".to_string())
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "<html></html>");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
