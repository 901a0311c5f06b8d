use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use palette_wander::config::APP_DIR;
use palette_wander::Config;
use tokio::fs;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Project-local config consulted before the per-user one.
const LOCAL_CONFIG: &str = "palette-wander.yaml";

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`; logs go to
/// stderr so structured command output stays clean.
pub fn init_logging(level: &str, debug: bool, format: LogFormat) -> Result<()> {
    let level: tracing::Level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

/// Resolves the config file (explicit path, `./palette-wander.yaml`, then
/// `<config dir>/palette-wander/config.yaml`) and parses it if present.
pub async fn load_config(explicit: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    if !fs::try_exists(&path).await.unwrap_or(false) {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(LoadedConfig {
            config: Config::default(),
            path,
        });
    }

    let config = parse_config(&path).await?;
    info!(path = %path.display(), "configuration loaded");
    Ok(LoadedConfig { config, path })
}

fn default_config_path() -> Result<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Ok(local);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push(APP_DIR);
    path.push("config.yaml");
    Ok(path)
}

async fn parse_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
