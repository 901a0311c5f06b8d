use async_trait::async_trait;
use wander_core_types::ElementId;

use crate::errors::ProbeError;
use crate::model::{ElementSnapshot, MarkerId, Rect};

/// The document as the probe sees it.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// Every element matching the interactive selector set, in document order.
    async fn interactive_elements(&self) -> Result<Vec<ElementSnapshot>, ProbeError>;

    async fn scroll_into_view(&self, element: ElementId) -> Result<(), ProbeError>;

    /// Current rendered box, read after scrolling.
    async fn element_rect(&self, element: ElementId) -> Result<Rect, ProbeError>;

    async fn show_marker(&self, x: f64, y: f64) -> Result<MarkerId, ProbeError>;

    async fn remove_marker(&self, marker: MarkerId);

    async fn click(&self, element: ElementId) -> Result<(), ProbeError>;

    async fn current_url(&self) -> String;

    async fn element_count(&self) -> usize;

    async fn reload(&self) -> Result<(), ProbeError>;
}

/// Observer of every click dispatched in the page, whoever triggered it.
#[async_trait]
pub trait ClickListener: Send + Sync {
    /// `path` starts at the event target and walks out through its ancestors.
    async fn on_click(&self, path: &[ElementSnapshot]);
}

/// Back channel used to tell the orchestrator the explore pass finished.
#[async_trait]
pub trait CompletionPort: Send + Sync {
    async fn explore_done(&self);
}
