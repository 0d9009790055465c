//! Tavily web-search wrapper.
//!
//! Web enhancement is optional and must never block generation: a missing
//! key, network failure, or bad payload all degrade to an empty snippet
//! list with a warning.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Tavily search endpoint.
const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

/// Timeout for one search round trip.
const SEARCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Upper bound on snippets per query, independent of configuration.
const MAX_RESULTS_CAP: usize = 10;

/// Client for the optional web-search service.
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    max_results: usize,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl SearchClient {
    /// Build a client. A `None` key means web enhancement is disabled —
    /// every search returns an empty sequence. `max_results` is the
    /// configured snippet count per query, clamped to a hard cap.
    pub fn new(api_key: Option<String>, max_results: usize) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("CourseGen/", env!("CARGO_PKG_VERSION")))
            .timeout(SEARCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            http,
            endpoint: TAVILY_ENDPOINT.to_string(),
            api_key,
            max_results: max_results.clamp(1, MAX_RESULTS_CAP),
        }
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether a search credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search and return text snippets, best effort. Soft-fails to an empty
    /// vec on any error.
    pub async fn search(&self, query: &str) -> Vec<String> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("search skipped: no API key configured");
            return Vec::new();
        };

        let body = SearchRequest {
            api_key: key,
            query,
            max_results: self.max_results,
        };

        let response = match self.http.post(&self.endpoint).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "web search request failed, continuing without enhancement");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "web search returned an error status");
            return Vec::new();
        }

        let parsed: SearchResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "web search returned an unexpected payload");
                return Vec::new();
            }
        };

        let snippets = dedupe_snippets(parsed.results);
        debug!(count = snippets.len(), "search snippets collected");
        snippets
    }
}

/// Convert results to snippets, dropping empty entries and exact duplicates
/// while preserving order.
fn dedupe_snippets(results: Vec<SearchResult>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    results
        .into_iter()
        .filter_map(|r| {
            let snippet = if r.title.is_empty() {
                r.content.trim().to_string()
            } else {
                format!("{}: {}", r.title.trim(), r.content.trim())
            };
            if snippet.is_empty() || snippet == ":" {
                return None;
            }
            seen.insert(snippet.clone()).then_some(snippet)
        })
        .collect()
}
