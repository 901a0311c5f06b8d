//! Application-level error type.
//!
//! Wraps the per-crate errors so the wiring code can use `?` across crate
//! boundaries; the CLI layer converts into `anyhow` with context.

use click_probe::ProbeError;
use page_bridge::BridgeError;
use palette_styler::StyleError;
use site_ledger::LedgerError;
use thiserror::Error;
use wander_core_types::WanderError;
use wander_sequencer::SequencerError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown palette '{0}'")]
    UnknownPalette(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<AppError> for WanderError {
    fn from(err: AppError) -> Self {
        WanderError::new(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
