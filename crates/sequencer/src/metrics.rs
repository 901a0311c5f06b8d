use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    started: AtomicU64,
    tabs_opened: AtomicU64,
    explore_completed: AtomicU64,
    timeouts: AtomicU64,
    unreachable: AtomicU64,
    finished: AtomicU64,
    abandoned: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub fn record_started() {
    increment(&COUNTERS.started);
}

pub fn record_tab_opened() {
    increment(&COUNTERS.tabs_opened);
}

pub fn record_explore_completed() {
    increment(&COUNTERS.explore_completed);
}

pub fn record_timeout() {
    increment(&COUNTERS.timeouts);
}

pub fn record_unreachable() {
    increment(&COUNTERS.unreachable);
}

pub fn record_finished() {
    increment(&COUNTERS.finished);
}

pub fn record_abandoned() {
    increment(&COUNTERS.abandoned);
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct SequencerMetricsSnapshot {
    pub started: u64,
    pub tabs_opened: u64,
    pub explore_completed: u64,
    pub timeouts: u64,
    pub unreachable: u64,
    pub finished: u64,
    pub abandoned: u64,
}

pub fn snapshot() -> SequencerMetricsSnapshot {
    SequencerMetricsSnapshot {
        started: COUNTERS.started.load(Ordering::Relaxed),
        tabs_opened: COUNTERS.tabs_opened.load(Ordering::Relaxed),
        explore_completed: COUNTERS.explore_completed.load(Ordering::Relaxed),
        timeouts: COUNTERS.timeouts.load(Ordering::Relaxed),
        unreachable: COUNTERS.unreachable.load(Ordering::Relaxed),
        finished: COUNTERS.finished.load(Ordering::Relaxed),
        abandoned: COUNTERS.abandoned.load(Ordering::Relaxed),
    }
}
