use std::time::Duration;

use page_bridge::StartSequence;
use palette_styler::Theme;
use serde::{Deserialize, Serialize};

/// Normalised parameters of one sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceConfig {
    pub repetitions: u32,
    pub auto_explore: bool,
    pub candidate_urls: Vec<String>,
    pub theme: Option<Theme>,
}

impl SequenceConfig {
    /// Coerces the repetition count to at least one and drops blank urls.
    pub fn from_request(request: &StartSequence) -> Self {
        Self {
            repetitions: coerce_repetitions(request.repetitions),
            auto_explore: request.auto_explore,
            candidate_urls: clean_urls(&request.websites),
            theme: request.theme.clone(),
        }
    }
}

pub fn coerce_repetitions(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

pub(crate) fn clean_urls(urls: &[String]) -> Vec<String> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

/// Background-side timers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceTimings {
    pub advance_delay_ms: u64,
    pub explore_timeout_ms: u64,
    pub palette_timeout_ms: u64,
    pub load_timeout_ms: Option<u64>,
}

impl SequenceTimings {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn explore_timeout(&self) -> Duration {
        Duration::from_millis(self.explore_timeout_ms)
    }

    pub fn palette_timeout(&self) -> Duration {
        Duration::from_millis(self.palette_timeout_ms)
    }

    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for SequenceTimings {
    fn default() -> Self {
        Self {
            advance_delay_ms: 600,
            explore_timeout_ms: 8000,
            palette_timeout_ms: 2000,
            load_timeout_ms: None,
        }
    }
}

/// How one opened tab was resolved before the next advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// The page signalled `auto_explore_done`.
    Explored,
    /// Explore timeout fired first; the site was recorded.
    TimedOut,
    /// No page context answered; the site was recorded.
    Unreachable,
    /// Non auto-explore tab advanced after the fixed delay.
    Delayed,
    /// Non auto-explore tab never reported a finished load.
    LoadLost,
}

impl StepOutcome {
    pub fn recorded_in_ledger(self) -> bool {
        matches!(self, StepOutcome::TimedOut | StepOutcome::Unreachable)
    }
}
