//! HTTP liveness probe via reqwest

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

const USER_AGENT: &str = concat!("bibsweep/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with a concurrency limit
#[derive(Clone)]
pub struct LinkProbe {
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
}

impl LinkProbe {
    /// Create a probe allowing `concurrency` requests in flight, each bounded
    /// by `timeout`
    pub fn new(concurrency: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        })
    }

    /// GET the URL and report what came back. Never fails: transport errors
    /// end up in [`ProbeResult::error`].
    pub async fn probe(&self, url: &str) -> ProbeResult {
        if let Err(e) = url::Url::parse(url) {
            tracing::debug!(url, error = %e, "not an absolute URL");
            return ProbeResult::failed("INVALID_URL");
        }

        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => return ProbeResult::failed("NETWORK_ERROR"),
        };

        match self.client.get(url).send().await {
            Ok(response) => ProbeResult {
                status: Some(response.status().as_u16()),
                error: None,
            },
            Err(e) => {
                tracing::debug!(url, error = %e, "request failed");
                ProbeResult::failed(classify_error(&e))
            }
        }
    }
}

/// Outcome of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ProbeResult {
    fn failed(code: &str) -> Self {
        Self {
            status: None,
            error: Some(code.to_string()),
        }
    }

    /// Broken means a 404 or no response at all. Every other status,
    /// 5xx included, counts as alive.
    pub fn is_broken(&self) -> bool {
        match self.status {
            Some(status) => status == 404,
            None => true,
        }
    }
}

fn classify_error(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "TIMEOUT"
    } else if error.is_connect() {
        "CONNECTION_FAILED"
    } else if error.is_redirect() {
        "REDIRECT_LOOP"
    } else if error.is_builder() {
        "INVALID_URL"
    } else {
        "NETWORK_ERROR"
    }
}
