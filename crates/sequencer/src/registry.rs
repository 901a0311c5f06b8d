//! Owned state of every live sequence.
//!
//! All mutations happen under one lock and never across an `.await`. The
//! tab index and the per-sequence tracker maps are kept in step by the
//! accessors below, so a tab has a tracker iff it is indexed.

use std::collections::HashMap;
use std::sync::Arc;

use palette_styler::Theme;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use wander_core_types::{SequenceId, TabId};

use crate::model::SequenceConfig;

#[derive(Debug)]
struct Tracker {
    url: String,
    deadline: Option<Instant>,
    done: Option<oneshot::Sender<()>>,
}

#[derive(Debug)]
struct SequenceState {
    remaining: u32,
    candidate_urls: Arc<Vec<String>>,
    auto_explore: bool,
    theme: Option<Arc<Theme>>,
    trackers: HashMap<TabId, Tracker>,
}

#[derive(Debug, Default)]
struct State {
    sequences: HashMap<SequenceId, SequenceState>,
    tab_index: HashMap<TabId, SequenceId>,
}

/// Read-only copy of the parts of a sequence a step needs.
#[derive(Clone, Debug)]
pub struct SequenceView {
    pub remaining: u32,
    pub candidate_urls: Arc<Vec<String>>,
    pub auto_explore: bool,
    pub theme: Option<Arc<Theme>>,
}

/// A tracker removed from the registry. Whoever holds it owns the tab's advance.
#[derive(Debug)]
pub struct TakenTracker {
    pub sequence: SequenceId,
    pub url: String,
    pub was_armed: bool,
    done: Option<oneshot::Sender<()>>,
}

impl TakenTracker {
    /// Wakes the step waiting on this tab. Returns false if it already gave up.
    pub fn signal(mut self) -> bool {
        self.done
            .take()
            .map(|tx| tx.send(()).is_ok())
            .unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct SequenceRegistry {
    state: Mutex<State>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh sequence. Returns false if the id is already live.
    pub fn create(&self, id: SequenceId, config: SequenceConfig) -> bool {
        let mut state = self.state.lock();
        if state.sequences.contains_key(&id) {
            return false;
        }
        state.sequences.insert(
            id,
            SequenceState {
                remaining: config.repetitions,
                candidate_urls: Arc::new(config.candidate_urls),
                auto_explore: config.auto_explore,
                theme: config.theme.map(Arc::new),
                trackers: HashMap::new(),
            },
        );
        true
    }

    pub fn view(&self, id: &SequenceId) -> Option<SequenceView> {
        let state = self.state.lock();
        state.sequences.get(id).map(|seq| SequenceView {
            remaining: seq.remaining,
            candidate_urls: Arc::clone(&seq.candidate_urls),
            auto_explore: seq.auto_explore,
            theme: seq.theme.clone(),
        })
    }

    /// Counts one repetition and installs the tab's tracker. The returned
    /// receiver resolves when the tracker is taken by a completion signal.
    pub fn record_open(
        &self,
        id: &SequenceId,
        tab: TabId,
        url: &str,
    ) -> Option<(u32, oneshot::Receiver<()>)> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let seq = state.sequences.get_mut(id)?;
        let (tx, rx) = oneshot::channel();
        seq.remaining = seq.remaining.saturating_sub(1);
        if let Some(stale) = seq.trackers.insert(
            tab,
            Tracker {
                url: url.to_string(),
                deadline: None,
                done: Some(tx),
            },
        ) {
            tracing::warn!(%tab, url = %stale.url, "tab id reused while tracked");
        }
        let remaining = seq.remaining;
        if let Some(previous) = state.tab_index.insert(tab, id.clone()) {
            if &previous != id {
                if let Some(other) = state.sequences.get_mut(&previous) {
                    other.trackers.remove(&tab);
                }
            }
        }
        Some((remaining, rx))
    }

    /// Arms the tab's explore timeout. A tracker is armed at most once;
    /// returns false when it is gone or already armed.
    pub fn arm_timeout(&self, tab: TabId, deadline: Instant) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(id) = state.tab_index.get(&tab) else {
            return false;
        };
        let Some(tracker) = state
            .sequences
            .get_mut(id)
            .and_then(|seq| seq.trackers.get_mut(&tab))
        else {
            return false;
        };
        if tracker.deadline.is_some() {
            return false;
        }
        tracker.deadline = Some(deadline);
        true
    }

    #[cfg(test)]
    fn deadline(&self, tab: TabId) -> Option<Instant> {
        let state = self.state.lock();
        let id = state.tab_index.get(&tab)?;
        state.sequences.get(id)?.trackers.get(&tab)?.deadline
    }

    /// Removes the tab's tracker, disarming its timeout. Exactly one caller
    /// wins for a given tab.
    pub fn take_tracker(&self, tab: TabId) -> Option<TakenTracker> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let id = state.tab_index.remove(&tab)?;
        let tracker = state.sequences.get_mut(&id)?.trackers.remove(&tab)?;
        Some(TakenTracker {
            sequence: id,
            url: tracker.url,
            was_armed: tracker.deadline.is_some(),
            done: tracker.done,
        })
    }

    /// Takes the tracker on behalf of a page completion signal. Tabs of a
    /// fixed-delay sequence keep their tracker: only the delay resolves them.
    pub fn take_explore_tracker(&self, tab: TabId) -> Option<TakenTracker> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let id = state.tab_index.get(&tab)?.clone();
        let seq = state.sequences.get_mut(&id)?;
        if !seq.auto_explore {
            return None;
        }
        let tracker = seq.trackers.remove(&tab)?;
        state.tab_index.remove(&tab);
        Some(TakenTracker {
            sequence: id,
            url: tracker.url,
            was_armed: tracker.deadline.is_some(),
            done: tracker.done,
        })
    }

    /// Destroys a sequence and every tracker it still owns.
    pub fn remove(&self, id: &SequenceId) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(seq) = state.sequences.remove(id) else {
            return false;
        };
        for tab in seq.trackers.keys() {
            state.tab_index.remove(tab);
        }
        true
    }

    /// Destroys the sequence if its budget is spent.
    pub fn finish_if_exhausted(&self, id: &SequenceId) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.sequences.get(id) {
            Some(seq) if seq.remaining == 0 => {
                if let Some(seq) = state.sequences.remove(id) {
                    for tab in seq.trackers.keys() {
                        state.tab_index.remove(tab);
                    }
                }
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, id: &SequenceId) -> bool {
        self.state.lock().sequences.contains_key(id)
    }

    #[cfg(test)]
    fn sequence_for_tab(&self, tab: TabId) -> Option<SequenceId> {
        self.state.lock().tab_index.get(&tab).cloned()
    }

    pub fn active_count(&self) -> usize {
        self.state.lock().sequences.len()
    }

    pub fn tracker_count(&self) -> usize {
        let state = self.state.lock();
        debug_assert_eq!(
            state.tab_index.len(),
            state
                .sequences
                .values()
                .map(|seq| seq.trackers.len())
                .sum::<usize>()
        );
        state.tab_index.len()
    }
}
