use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Page-side timings for the auto-explore click and the reload watchdog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeTimings {
    pub scroll_delay_ms: u64,
    pub marker_ms: u64,
    pub reload_check_ms: u64,
}

impl ProbeTimings {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn marker(&self) -> Duration {
        Duration::from_millis(self.marker_ms)
    }

    pub fn reload_check(&self) -> Duration {
        Duration::from_millis(self.reload_check_ms)
    }
}

impl Default for ProbeTimings {
    fn default() -> Self {
        Self {
            scroll_delay_ms: 400,
            marker_ms: 700,
            reload_check_ms: 900,
        }
    }
}
