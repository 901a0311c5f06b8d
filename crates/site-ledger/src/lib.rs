pub mod ledger;
pub mod settings;
pub mod store;

use thiserror::Error;
use wander_core_types::WanderError;

pub use ledger::{UnregisteredSiteLedger, UNREGISTERED_SITES_KEY};
pub use settings::{WidgetSettings, WidgetState, CUSTOM_WEBSITES_KEY, WIDGET_STATE_KEY};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreMap};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store contents are not valid json: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("store root must be a json object")]
    NotAnObject,
}

impl From<LedgerError> for WanderError {
    fn from(err: LedgerError) -> Self {
        WanderError::new(err.to_string())
    }
}
