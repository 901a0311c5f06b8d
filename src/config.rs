//! Application configuration.
//!
//! Loaded from YAML by the CLI layer; every field has a default so a missing
//! or partial file is fine.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use click_probe::ProbeTimings;
use serde::{Deserialize, Serialize};
use tracing::info;
use wander_sequencer::SequenceTimings;

use crate::errors::AppError;

pub const APP_DIR: &str = "palette-wander";
pub const STORE_PATH_ENV: &str = "WANDER_STORE_PATH";
pub const TRENDING_ENDPOINT_ENV: &str = "WANDER_TRENDING_ENDPOINT";

/// Candidate sites used when neither the caller nor the trending feed supply any.
pub const DEFAULT_WEBSITES: [&str; 20] = [
    "https://www.wikipedia.org",
    "https://www.reddit.com",
    "https://news.ycombinator.com",
    "https://www.github.com",
    "https://www.producthunt.com",
    "https://www.dribbble.com",
    "https://www.behance.net",
    "https://www.spotify.com",
    "https://www.youtube.com",
    "https://www.nasa.gov",
    "https://www.khanacademy.org",
    "https://www.ted.com",
    "https://www.nature.com",
    "https://www.smithsonianmag.com",
    "https://www.nationalgeographic.com",
    "https://www.bbc.com",
    "https://www.medium.com",
    "https://www.dev.to",
    "https://www.stackoverflow.com",
    "https://www.openai.com",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON file backing settings and the unregistered-site ledger
    pub store_path: Option<PathBuf>,

    pub default_websites: Vec<String>,

    pub timings: SequenceTimings,

    pub probe: ProbeTimings,

    pub trending: TrendingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            default_websites: DEFAULT_WEBSITES.iter().map(|url| url.to_string()).collect(),
            timings: SequenceTimings::default(),
            probe: ProbeTimings::default(),
            trending: TrendingConfig::default(),
        }
    }
}

impl Config {
    /// Explicit `store_path`, else `<data dir>/palette-wander/store.json`.
    pub fn resolved_store_path(&self) -> Result<PathBuf, AppError> {
        if let Some(path) = self.store_path.as_ref() {
            return Ok(path.clone());
        }
        let mut path = dirs::data_dir()
            .ok_or_else(|| AppError::Config("no data directory for the store".into()))?;
        path.push(APP_DIR);
        path.push("store.json");
        Ok(path)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var(STORE_PATH_ENV) {
            if !path.trim().is_empty() {
                info!(path = %path, "store path overridden from {}", STORE_PATH_ENV);
                self.store_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(endpoint) = env::var(TRENDING_ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                info!(endpoint = %endpoint, "trending endpoint overridden from {}", TRENDING_ENDPOINT_ENV);
                self.trending.endpoint = endpoint;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    /// Use the trending feed when the caller does not ask explicitly
    pub enabled: bool,

    /// Base of a HackerNews-compatible API
    pub endpoint: String,

    /// Stories to inspect per fetch
    pub limit: usize,

    /// Per-request timeout, humantime syntax ("5s", "1500ms")
    pub request_timeout: String,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://hacker-news.firebaseio.com/v0".to_string(),
            limit: 30,
            request_timeout: "5s".to_string(),
        }
    }
}

impl TrendingConfig {
    pub fn request_timeout(&self) -> Result<Duration, AppError> {
        humantime::parse_duration(self.request_timeout.trim()).map_err(|err| {
            AppError::Config(format!(
                "invalid trending.request_timeout '{}': {err}",
                self.request_timeout
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "timings:\n  explore_timeout_ms: 1000\ntrending:\n  request_timeout: 1500ms\n",
        )
        .unwrap();
        assert_eq!(config.timings.explore_timeout_ms, 1000);
        assert_eq!(config.timings.advance_delay_ms, 600);
        assert_eq!(config.probe, ProbeTimings::default());
        assert_eq!(config.default_websites.len(), DEFAULT_WEBSITES.len());
        assert_eq!(
            config.trending.request_timeout().unwrap(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let trending = TrendingConfig {
            request_timeout: "soon".into(),
            ..TrendingConfig::default()
        };
        assert!(matches!(
            trending.request_timeout(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn explicit_store_path_wins() {
        let config = Config {
            store_path: Some(PathBuf::from("/tmp/wander.json")),
            ..Config::default()
        };
        assert_eq!(
            config.resolved_store_path().unwrap(),
            PathBuf::from("/tmp/wander.json")
        );
    }
}
