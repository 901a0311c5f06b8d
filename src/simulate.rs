//! End-to-end run of the orchestrator against the simulated browser.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use page_bridge::{BackgroundRequest, StartAck, StartSequence};
use palette_styler::Theme;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use wander_core_types::{SequenceId, TabId};
use wander_event_bus::{EventBus, InMemoryBus};
use wander_sequencer::metrics::{self, SequencerMetricsSnapshot};
use wander_sequencer::{
    CandidateSource, SequenceEvent, SequenceOrchestrator, Sequencer, StepOutcome,
};

use crate::app_context::AppContext;
use crate::browser_impl::{BrowserConfig, SimulatedBrowser, TabRecord};
use crate::errors::AppResult;

#[derive(Clone, Debug)]
pub struct SimulationPlan {
    pub sequences: usize,
    pub repetitions: i64,
    pub auto_explore: bool,
    pub websites: Vec<String>,
    pub use_trending: bool,
    pub theme: Option<Theme>,
    pub browser: BrowserConfig,
    pub seed: Option<u64>,
}

impl Default for SimulationPlan {
    fn default() -> Self {
        Self {
            sequences: 1,
            repetitions: 1,
            auto_explore: false,
            websites: Vec::new(),
            use_trending: false,
            theme: None,
            browser: BrowserConfig::default(),
            seed: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SequenceSummary {
    pub sequence: String,
    pub started: bool,
    pub used_trending: bool,
    pub tabs_opened: usize,
    pub outcomes: BTreeMap<String, usize>,
    pub abandoned: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub sequences: Vec<SequenceSummary>,
    pub tabs: Vec<TabRecord>,
    pub newly_unregistered: Vec<String>,
    pub ledger: Vec<String>,
    pub metrics: SequencerMetricsSnapshot,
}

/// Forwards page → background messages into the orchestrator until every
/// sender is gone.
pub fn spawn_router<S>(
    sequencer: S,
    mut inbound: mpsc::Receiver<(TabId, BackgroundRequest)>,
) -> JoinHandle<()>
where
    S: Sequencer + 'static,
{
    tokio::spawn(async move {
        while let Some((tab, request)) = inbound.recv().await {
            let reply = sequencer.handle_message(Some(tab), request).await;
            debug!(%tab, ?reply, "page message handled");
        }
    })
}

#[instrument(skip_all, fields(sequences = plan.sequences, repetitions = plan.repetitions))]
pub async fn run_simulation(
    ctx: &AppContext,
    plan: SimulationPlan,
    candidates: Option<Arc<dyn CandidateSource>>,
) -> AppResult<SimulationReport> {
    let (browser, inbound) = SimulatedBrowser::new(plan.browser.clone(), 64);
    let bus = InMemoryBus::<SequenceEvent>::new(1024);
    let events = bus.subscribe();

    let mut builder = SequenceOrchestrator::builder(browser.clone(), ctx.ledger())
        .with_events(bus.clone())
        .with_timings(ctx.config().timings.clone());
    if let Some(source) = candidates {
        builder = builder.with_candidates(source);
    }
    if let Some(seed) = plan.seed {
        builder = builder.with_seed(seed);
    }
    let orchestrator = builder.build();
    let router = spawn_router(orchestrator.clone(), inbound);

    let mut acks: Vec<StartAck> = Vec::with_capacity(plan.sequences);
    for _ in 0..plan.sequences.max(1) {
        let request = StartSequence {
            repetitions: plan.repetitions,
            auto_explore: plan.auto_explore,
            websites: plan.websites.clone(),
            use_trending: plan.use_trending,
            theme: plan.theme.clone(),
        };
        acks.push(orchestrator.start_sequence(request).await);
    }
    orchestrator.wait_idle().await;
    router.abort();

    info!(tabs = browser.history().len(), "simulation finished");
    let (sequences, newly_unregistered) = summarize(&acks, events);
    Ok(SimulationReport {
        sequences,
        tabs: browser.history(),
        newly_unregistered,
        ledger: ctx.ledger().list().await?,
        metrics: metrics::snapshot(),
    })
}

fn summarize(
    acks: &[StartAck],
    mut events: broadcast::Receiver<SequenceEvent>,
) -> (Vec<SequenceSummary>, Vec<String>) {
    let mut by_id: HashMap<SequenceId, SequenceSummary> = HashMap::new();
    let mut order = Vec::with_capacity(acks.len());
    for ack in acks {
        order.push(ack.sequence_id.clone());
        by_id.insert(
            ack.sequence_id.clone(),
            SequenceSummary {
                sequence: ack.sequence_id.to_string(),
                started: ack.ok,
                used_trending: ack.used_trending,
                ..SequenceSummary::default()
            },
        );
    }

    let mut unregistered = Vec::new();
    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "summary missed sequence events");
                continue;
            }
            Err(_) => break,
        };
        match event {
            SequenceEvent::TabOpened { sequence, .. } => {
                if let Some(summary) = by_id.get_mut(&sequence) {
                    summary.tabs_opened += 1;
                }
            }
            SequenceEvent::StepFinished {
                sequence, outcome, ..
            } => {
                if let Some(summary) = by_id.get_mut(&sequence) {
                    *summary.outcomes.entry(outcome_label(outcome)).or_default() += 1;
                }
            }
            SequenceEvent::Abandoned { sequence, reason } => {
                if let Some(summary) = by_id.get_mut(&sequence) {
                    summary.abandoned = Some(reason);
                }
            }
            SequenceEvent::SiteUnregistered { url } => unregistered.push(url),
            SequenceEvent::Started { .. } | SequenceEvent::Finished { .. } => {}
        }
    }

    let summaries = order
        .into_iter()
        .filter_map(|id| by_id.remove(&id))
        .collect();
    (summaries, unregistered)
}

fn outcome_label(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::Explored => "explored",
        StepOutcome::TimedOut => "timed_out",
        StepOutcome::Unreachable => "unreachable",
        StepOutcome::Delayed => "delayed",
        StepOutcome::LoadLost => "load_lost",
    }
    .to_string()
}
