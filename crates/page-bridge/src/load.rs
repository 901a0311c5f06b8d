//! One-shot "page load complete" subscriptions.
//!
//! A [`LoadWatch`] is registered per tab and releases its registry slot when
//! dropped, so every exit path of a step deregisters exactly once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::trace;
use wander_core_types::TabId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The host dropped the subscription (tab closed or host shut down).
    Closed,
}

#[derive(Debug)]
struct Waiter {
    id: u64,
    tx: oneshot::Sender<()>,
}

/// Bookkeeping a [`crate::TabHost`] uses to hand out load subscriptions.
#[derive(Debug, Default)]
pub struct LoadRegistry {
    next_id: AtomicU64,
    waiters: DashMap<TabId, Vec<Waiter>>,
}

impl LoadRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn watch(self: &Arc<Self>, tab: TabId) -> LoadWatch {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.waiters.entry(tab).or_default().push(Waiter { id, tx });
        trace!(%tab, id, "load watch registered");
        LoadWatch {
            tab,
            id,
            rx: Some(rx),
            registry: Arc::downgrade(self),
        }
    }

    /// Fires and removes every subscription for `tab`. Returns how many fired.
    pub fn notify_complete(&self, tab: TabId) -> usize {
        let Some((_, waiters)) = self.waiters.remove(&tab) else {
            return 0;
        };
        waiters
            .into_iter()
            .map(|waiter| waiter.tx.send(()).is_ok())
            .filter(|delivered| *delivered)
            .count()
    }

    /// Drops every subscription for `tab` without firing it.
    pub fn discard(&self, tab: TabId) {
        self.waiters.remove(&tab);
    }

    pub fn active(&self, tab: TabId) -> usize {
        self.waiters.get(&tab).map(|w| w.len()).unwrap_or(0)
    }

    pub fn total_active(&self) -> usize {
        self.waiters.iter().map(|entry| entry.value().len()).sum()
    }

    fn release(&self, tab: TabId, id: u64) {
        let now_empty = match self.waiters.get_mut(&tab) {
            Some(mut waiters) => {
                waiters.retain(|w| w.id != id);
                waiters.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.waiters.remove_if(&tab, |_, waiters| waiters.is_empty());
        }
    }
}

/// Subscription handle for one tab's load completion.
#[derive(Debug)]
pub struct LoadWatch {
    tab: TabId,
    id: u64,
    rx: Option<oneshot::Receiver<()>>,
    registry: Weak<LoadRegistry>,
}

impl LoadWatch {
    /// A watch that resolves immediately; for hosts that only hand out loaded tabs.
    pub fn ready(tab: TabId) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(());
        Self {
            tab,
            id: u64::MAX,
            rx: Some(rx),
            registry: Weak::new(),
        }
    }

    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Waits for the load event. Resolves at most once; later calls report `Closed`.
    pub async fn completed(&mut self) -> LoadOutcome {
        let Some(rx) = self.rx.as_mut() else {
            return LoadOutcome::Closed;
        };
        let outcome = match rx.await {
            Ok(()) => LoadOutcome::Loaded,
            Err(_) => LoadOutcome::Closed,
        };
        self.rx = None;
        outcome
    }
}

impl Drop for LoadWatch {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.release(self.tab, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_fires_and_clears() {
        let registry = LoadRegistry::new();
        let mut watch = registry.watch(TabId(1));
        assert_eq!(registry.active(TabId(1)), 1);
        assert_eq!(registry.notify_complete(TabId(1)), 1);
        assert_eq!(watch.completed().await, LoadOutcome::Loaded);
        assert_eq!(watch.completed().await, LoadOutcome::Closed);
        assert_eq!(registry.total_active(), 0);
    }

    #[tokio::test]
    async fn dropping_watch_releases_slot() {
        let registry = LoadRegistry::new();
        let first = registry.watch(TabId(4));
        let _second = registry.watch(TabId(4));
        assert_eq!(registry.active(TabId(4)), 2);
        drop(first);
        assert_eq!(registry.active(TabId(4)), 1);
    }

    #[tokio::test]
    async fn discarded_tab_reports_closed() {
        let registry = LoadRegistry::new();
        let mut watch = registry.watch(TabId(2));
        registry.discard(TabId(2));
        assert_eq!(watch.completed().await, LoadOutcome::Closed);
        assert_eq!(registry.notify_complete(TabId(2)), 0);
    }

    #[tokio::test]
    async fn ready_watch_resolves_immediately() {
        let mut watch = LoadWatch::ready(TabId(9));
        assert_eq!(watch.completed().await, LoadOutcome::Loaded);
    }
}
