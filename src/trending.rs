//! Trending candidate source backed by a HackerNews-compatible API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use wander_sequencer::CandidateSource;

use crate::config::TrendingConfig;
use crate::errors::AppResult;

#[derive(Debug, Deserialize)]
struct Story {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone)]
pub struct HackerNewsSource {
    client: Client,
    endpoint: String,
    limit: usize,
}

impl HackerNewsSource {
    pub fn new(endpoint: impl Into<String>, limit: usize, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            limit,
        })
    }

    pub fn from_config(config: &TrendingConfig) -> AppResult<Self> {
        Self::new(
            config.endpoint.clone(),
            config.limit,
            config.request_timeout()?,
        )
    }

    /// Story URLs of the current top stories, in ranking order. Stories
    /// without an external link are skipped.
    pub async fn top_story_urls(&self) -> AppResult<Vec<String>> {
        let ids: Vec<u64> = self
            .client
            .get(format!("{}/topstories.json", self.endpoint))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut tasks = JoinSet::new();
        for (rank, id) in ids.into_iter().take(self.limit).enumerate() {
            let client = self.client.clone();
            let url = format!("{}/item/{id}.json", self.endpoint);
            tasks.spawn(async move {
                let story = client
                    .get(url)
                    .send()
                    .await
                    .and_then(|resp| resp.error_for_status());
                let story: Option<Story> = match story {
                    Ok(resp) => resp.json().await.ok(),
                    Err(err) => {
                        debug!(id, error = %err, "story fetch failed");
                        None
                    }
                };
                (rank, story.and_then(|story| story.url))
            });
        }

        let mut ranked = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((rank, Some(url))) if is_web_url(&url) => ranked.push((rank, url)),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "story task failed"),
            }
        }
        ranked.sort_by_key(|(rank, _)| *rank);
        Ok(ranked.into_iter().map(|(_, url)| url).collect())
    }
}

fn is_web_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[async_trait]
impl CandidateSource for HackerNewsSource {
    async fn fetch_candidate_urls(&self) -> Option<Vec<String>> {
        match self.top_story_urls().await {
            Ok(urls) if !urls.is_empty() => {
                debug!(count = urls.len(), "trending candidates fetched");
                Some(urls)
            }
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "trending fetch failed; falling back");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_links_are_candidates() {
        assert!(is_web_url("https://example.com/a"));
        assert!(is_web_url("http://example.com"));
        assert!(!is_web_url("ftp://example.com"));
        assert!(!is_web_url("item?id=1"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_none() {
        let source =
            HackerNewsSource::new("http://127.0.0.1:9", 5, Duration::from_millis(200)).unwrap();
        assert_eq!(source.fetch_candidate_urls().await, None);
    }
}
