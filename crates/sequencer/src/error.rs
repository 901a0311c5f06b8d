use page_bridge::BridgeError;
use site_ledger::LedgerError;
use thiserror::Error;
use wander_core_types::WanderError;

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("no candidate urls to browse")]
    NoCandidates,
    #[error("sequence vanished while opening a tab")]
    SequenceGone,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<SequencerError> for WanderError {
    fn from(value: SequencerError) -> Self {
        WanderError::new(value.to_string())
    }
}
