use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use wander_core_types::redact_url;

use crate::model::{ElementSnapshot, ReloadVerdict};
use crate::policy::ProbeTimings;
use crate::ports::{ClickListener, PagePort};
use crate::select;

/// Largest element-count delta still treated as "nothing happened".
pub fn reload_threshold(prior_count: usize) -> usize {
    (prior_count / 100).max(3)
}

/// Page-wide safeguard: reloads the page when a click on an interactive
/// element neither navigated nor visibly changed the document.
///
/// Holds the page weakly since the page owns its click listeners.
pub struct ReloadWatchdog {
    page: Weak<dyn PagePort>,
    timings: ProbeTimings,
}

impl ReloadWatchdog {
    pub fn new(page: Arc<dyn PagePort>, timings: ProbeTimings) -> Self {
        Self {
            page: Arc::downgrade(&page),
            timings,
        }
    }

    /// Snapshots the page and schedules the check. `path` is the click
    /// target followed by its ancestors. Returns `None` when no interactive
    /// element is on the path, when that element opts out, or when the
    /// page is gone.
    pub async fn observe_click(
        &self,
        path: &[ElementSnapshot],
    ) -> Option<JoinHandle<ReloadVerdict>> {
        let target = select::closest_interactive(path)?;
        if target.no_reload {
            debug!(element = %target.id, "reload opt-out");
            return None;
        }
        let page = self.page.upgrade()?;
        let before_url = page.current_url().await;
        let before_count = page.element_count().await;
        let delay = self.timings.reload_check();

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let after_url = page.current_url().await;
            if after_url != before_url {
                debug!(url = %redact_url(&after_url), "click navigated");
                return ReloadVerdict::Navigated;
            }
            let after_count = page.element_count().await;
            if after_count.abs_diff(before_count) > reload_threshold(before_count) {
                return ReloadVerdict::Changed;
            }
            info!(
                url = %redact_url(&after_url),
                before_count,
                after_count,
                "click had no visible effect; reloading"
            );
            if let Err(err) = page.reload().await {
                warn!(?err, "reload failed");
            }
            ReloadVerdict::Reloaded
        }))
    }
}

#[async_trait]
impl ClickListener for ReloadWatchdog {
    async fn on_click(&self, path: &[ElementSnapshot]) {
        // the check runs detached
        let _check = self.observe_click(path).await;
    }
}

#[cfg(test)]
mod tests {
    use super::reload_threshold;

    #[test]
    fn threshold_has_a_floor_of_three() {
        assert_eq!(reload_threshold(0), 3);
        assert_eq!(reload_threshold(399), 3);
        assert_eq!(reload_threshold(400), 4);
        assert_eq!(reload_threshold(1_250), 12);
    }
}
