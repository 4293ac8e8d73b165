//! Link liveness checking
//!
//! Every URL is fetched once with a short timeout. A 404 or any transport
//! failure marks it broken; any other status counts as alive.

use crate::probe::LinkProbe;
use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;

/// Configuration for link checking
#[derive(Debug, Clone)]
pub struct CheckLinksConfig {
    pub concurrency: usize,
    pub timeout_ms: u64,
}

impl Default for CheckLinksConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout_ms: 5000,
        }
    }
}

/// Result for a single link check (compact)
#[derive(Debug, Clone, Serialize)]
pub struct LinkResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub broken: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full report (compact)
#[derive(Debug, Serialize)]
pub struct LinkReport {
    pub ok: usize,
    pub broken: usize,
    pub results: Vec<LinkResult>,
}

impl LinkReport {
    /// URLs classified as broken, in URL order
    pub fn broken_urls(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.broken)
            .map(|r| r.url.as_str())
    }
}

/// Check multiple links and generate report. Results are sorted by URL.
pub async fn check_links(urls: &[String], config: &CheckLinksConfig) -> Result<LinkReport> {
    let probe = LinkProbe::new(config.concurrency, Duration::from_millis(config.timeout_ms))?;

    let tasks = urls.iter().map(|url| {
        let probe = probe.clone();
        async move {
            tracing::debug!("  -> {}", truncate(url, 60));
            let result = probe.probe(url).await;
            LinkResult {
                url: url.clone(),
                status: result.status,
                broken: result.is_broken(),
                error: result.error,
            }
        }
    });

    let mut results = join_all(tasks).await;
    results.sort_by(|a, b| a.url.cmp(&b.url));

    let broken = results.iter().filter(|r| r.broken).count();
    tracing::info!(checked = results.len(), broken, "link check finished");

    Ok(LinkReport {
        ok: results.len() - broken,
        broken,
        results,
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
