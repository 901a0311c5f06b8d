//! Cross-context bridge between the background coordinator and page contexts.
//!
//! Page messaging is modelled as a typed [`Delivery`] instead of an ambient
//! "last error" flag, and load notifications as RAII [`LoadWatch`] handles.

pub mod load;
pub mod messages;

pub use load::{LoadOutcome, LoadRegistry, LoadWatch};
pub use messages::{
    BackgroundReply, BackgroundRequest, ExploreDoneAck, PageReply, PageRequest, StartAck,
    StartSequence,
};

use async_trait::async_trait;
use thiserror::Error;
use wander_core_types::{TabId, WanderError};

/// Result of sending a request into a page context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery<T> {
    Delivered(T),
    /// Nothing listens in the page (restricted or browser-internal page).
    Unreachable,
}

/// Errors surfaced by the bridge.
#[derive(Clone, Debug, Error)]
pub enum BridgeError {
    #[error("tab creation failed: {0}")]
    TabCreation(String),
    #[error("unsupported environment")]
    Unsupported,
    #[error("channel closed")]
    ChannelClosed,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<BridgeError> for WanderError {
    fn from(err: BridgeError) -> Self {
        WanderError::new(err.to_string())
    }
}

/// Browser surface the orchestrator drives.
#[async_trait]
pub trait TabHost: Send + Sync {
    async fn create_tab(&self, url: &str) -> Result<TabId, BridgeError>;

    /// Registers a one-shot load observer for `tab`; dropping the watch deregisters it.
    fn watch_load(&self, tab: TabId) -> LoadWatch;

    async fn send_to_page(&self, tab: TabId, request: PageRequest) -> Delivery<PageReply>;
}
