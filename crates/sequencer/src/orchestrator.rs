use std::sync::Arc;

use page_bridge::{
    BackgroundReply, BackgroundRequest, Delivery, ExploreDoneAck, LoadOutcome, LoadWatch,
    PageRequest, StartAck, StartSequence, TabHost,
};
use palette_styler::Theme;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use site_ledger::UnregisteredSiteLedger;
use tokio::sync::{oneshot, Notify};
use tokio::time::{sleep, sleep_until, timeout, Instant};
use tracing::{debug, info, instrument, warn};
use wander_core_types::{redact_url, SequenceId, TabId};
use wander_event_bus::EventBus;

use crate::error::SequencerError;
use crate::events::SequenceEvent;
use crate::metrics;
use crate::model::{clean_urls, SequenceConfig, SequenceTimings, StepOutcome};
use crate::ports::CandidateSource;
use crate::registry::{SequenceRegistry, SequenceView};

pub struct SequenceOrchestratorBuilder {
    host: Arc<dyn TabHost>,
    ledger: Arc<UnregisteredSiteLedger>,
    candidates: Option<Arc<dyn CandidateSource>>,
    events: Option<Arc<dyn EventBus<SequenceEvent>>>,
    timings: SequenceTimings,
    seed: Option<u64>,
}

impl SequenceOrchestratorBuilder {
    pub fn with_candidates(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.candidates = Some(source);
        self
    }

    pub fn with_events(mut self, bus: Arc<dyn EventBus<SequenceEvent>>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn with_timings(mut self, timings: SequenceTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> SequenceOrchestrator {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SequenceOrchestrator {
            inner: Arc::new(Inner {
                host: self.host,
                ledger: self.ledger,
                candidates: self.candidates,
                events: self.events,
                timings: self.timings,
                registry: SequenceRegistry::new(),
                rng: Mutex::new(rng),
                finished: Notify::new(),
            }),
        }
    }
}

/// Background coordinator for random-browsing sequences.
///
/// Each sequence is owned by one driver task that alternates `advance` and a
/// step for the tab it just opened, so every opened tab leads to exactly one
/// further advance.
#[derive(Clone)]
pub struct SequenceOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    host: Arc<dyn TabHost>,
    ledger: Arc<UnregisteredSiteLedger>,
    candidates: Option<Arc<dyn CandidateSource>>,
    events: Option<Arc<dyn EventBus<SequenceEvent>>>,
    timings: SequenceTimings,
    registry: SequenceRegistry,
    rng: Mutex<StdRng>,
    finished: Notify,
}

/// A tab `advance` opened, handed to the step that resolves it.
struct OpenedTab {
    tab: TabId,
    url: String,
    done: oneshot::Receiver<()>,
    load: LoadWatch,
}

impl SequenceOrchestrator {
    pub fn builder(
        host: Arc<dyn TabHost>,
        ledger: Arc<UnregisteredSiteLedger>,
    ) -> SequenceOrchestratorBuilder {
        SequenceOrchestratorBuilder {
            host,
            ledger,
            candidates: None,
            events: None,
            timings: SequenceTimings::default(),
            seed: None,
        }
    }

    /// Creates a sequence and starts its driver. Always acknowledges; `ok`
    /// is false only when there is nothing to browse.
    pub async fn start_sequence(&self, request: StartSequence) -> StartAck {
        let mut config = SequenceConfig::from_request(&request);
        let mut used_trending = false;
        if request.use_trending {
            match self.fetch_candidates().await {
                Some(urls) => {
                    config.candidate_urls = urls;
                    used_trending = true;
                }
                None => debug!("trending candidates unavailable; using caller websites"),
            }
        }

        let sequence_id = SequenceId::new();
        if config.candidate_urls.is_empty() {
            warn!(sequence = %sequence_id, error = %SequencerError::NoCandidates, "sequence not started");
            return StartAck {
                ok: false,
                sequence_id,
                used_trending,
            };
        }

        let repetitions = config.repetitions;
        let auto_explore = config.auto_explore;
        if !self.inner.registry.create(sequence_id.clone(), config) {
            warn!(sequence = %sequence_id, "sequence id collision");
            return StartAck {
                ok: false,
                sequence_id,
                used_trending,
            };
        }
        metrics::record_started();
        info!(
            sequence = %sequence_id,
            repetitions,
            auto_explore,
            used_trending,
            "sequence started"
        );

        let ack = StartAck {
            ok: true,
            sequence_id: sequence_id.clone(),
            used_trending,
        };
        self.inner
            .publish(SequenceEvent::started(&ack, repetitions, auto_explore))
            .await;
        tokio::spawn(Arc::clone(&self.inner).drive(sequence_id));
        ack
    }

    /// Completion signal from the page in `tab`. Returns whether a live
    /// auto-explore tracker consumed it; unknown, already resolved or
    /// fixed-delay tabs change nothing.
    pub fn on_explore_done(&self, tab: TabId) -> bool {
        match self.inner.registry.take_explore_tracker(tab) {
            Some(tracker) => {
                debug!(%tab, sequence = %tracker.sequence, "explore done");
                metrics::record_explore_completed();
                if !tracker.signal() {
                    debug!(%tab, "step already moved on");
                }
                true
            }
            None => false,
        }
    }

    /// Background entry point of the cross-context message contract.
    pub async fn handle_message(
        &self,
        sender: Option<TabId>,
        request: BackgroundRequest,
    ) -> BackgroundReply {
        match request {
            BackgroundRequest::StartSequence(start) => {
                BackgroundReply::Started(self.start_sequence(start).await)
            }
            BackgroundRequest::AutoExploreDone => {
                let continued = sender.map(|tab| self.on_explore_done(tab)).unwrap_or(false);
                BackgroundReply::ExploreDone(ExploreDoneAck {
                    ok: true,
                    continued,
                })
            }
            BackgroundRequest::Log { message } => {
                match sender {
                    Some(tab) => debug!(%tab, %message, "page log"),
                    None => debug!(%message, "page log"),
                }
                BackgroundReply::Logged { ok: true }
            }
        }
    }

    pub fn is_active(&self, id: &SequenceId) -> bool {
        self.inner.registry.contains(id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.registry.active_count()
    }

    pub fn tracker_count(&self) -> usize {
        self.inner.registry.tracker_count()
    }

    pub fn registry(&self) -> &SequenceRegistry {
        &self.inner.registry
    }

    /// Resolves once the sequence is no longer active.
    pub async fn wait_finished(&self, id: &SequenceId) {
        loop {
            let notified = self.inner.finished.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_active(id) {
                return;
            }
            notified.await;
        }
    }

    /// Resolves once no sequence is active.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.finished.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active_count() == 0 {
                return;
            }
            notified.await;
        }
    }

    async fn fetch_candidates(&self) -> Option<Vec<String>> {
        let source = self.inner.candidates.as_ref()?;
        let urls = clean_urls(&source.fetch_candidate_urls().await?);
        if urls.is_empty() {
            None
        } else {
            Some(urls)
        }
    }
}

impl Inner {
    #[instrument(skip_all, fields(sequence = %id))]
    async fn drive(self: Arc<Self>, id: SequenceId) {
        while let Some(opened) = self.advance(&id).await {
            let tab = opened.tab;
            let outcome = self.step(&id, opened).await;
            debug!(%tab, ?outcome, "step finished");
            self.publish(SequenceEvent::StepFinished {
                sequence: id.clone(),
                tab,
                outcome,
            })
            .await;
        }
        self.finished.notify_waiters();
    }

    /// Opens the next tab, or ends the sequence when its budget is spent.
    async fn advance(&self, id: &SequenceId) -> Option<OpenedTab> {
        let view = self.registry.view(id)?;
        if view.remaining == 0 {
            if self.registry.finish_if_exhausted(id) {
                metrics::record_finished();
                info!(sequence = %id, "sequence finished");
                self.publish(SequenceEvent::Finished {
                    sequence: id.clone(),
                })
                .await;
            }
            return None;
        }

        match self.open_tab(id, &view).await {
            Ok(opened) => Some(opened),
            Err(err) => {
                if self.registry.remove(id) {
                    metrics::record_abandoned();
                    warn!(sequence = %id, error = %err, "sequence abandoned");
                    self.publish(SequenceEvent::Abandoned {
                        sequence: id.clone(),
                        reason: err.to_string(),
                    })
                    .await;
                }
                None
            }
        }
    }

    async fn open_tab(
        &self,
        id: &SequenceId,
        view: &SequenceView,
    ) -> Result<OpenedTab, SequencerError> {
        let url = {
            let mut rng = self.rng.lock();
            view.candidate_urls.choose(&mut *rng).cloned()
        }
        .ok_or(SequencerError::NoCandidates)?;

        let tab = self.host.create_tab(&url).await?;
        let load = self.host.watch_load(tab);
        let (remaining, done) = self
            .registry
            .record_open(id, tab, &url)
            .ok_or(SequencerError::SequenceGone)?;
        metrics::record_tab_opened();
        debug!(%tab, url = %redact_url(&url), remaining, "tab opened");
        self.publish(SequenceEvent::TabOpened {
            sequence: id.clone(),
            tab,
            url: url.clone(),
            remaining,
        })
        .await;
        Ok(OpenedTab {
            tab,
            url,
            done,
            load,
        })
    }

    /// Waits for the tab's load, then resolves it. The load subscription is
    /// released on every path.
    async fn step(&self, id: &SequenceId, opened: OpenedTab) -> StepOutcome {
        let OpenedTab {
            tab,
            url,
            done,
            mut load,
        } = opened;

        let loaded = match self.timings.load_timeout() {
            Some(limit) => timeout(limit, load.completed())
                .await
                .unwrap_or(LoadOutcome::Closed),
            None => load.completed().await,
        };
        drop(load);

        let Some(view) = self.registry.view(id) else {
            self.registry.take_tracker(tab);
            return StepOutcome::LoadLost;
        };

        if loaded != LoadOutcome::Loaded {
            debug!(%tab, "page load never completed");
            if view.auto_explore {
                return self.resolve_unreachable(tab, &url).await;
            }
            self.registry.take_tracker(tab);
            return StepOutcome::LoadLost;
        }

        self.on_page_load_complete(tab, &url, done, &view).await
    }

    async fn on_page_load_complete(
        &self,
        tab: TabId,
        url: &str,
        mut done: oneshot::Receiver<()>,
        view: &SequenceView,
    ) -> StepOutcome {
        if let Some(theme) = view.theme.as_deref() {
            self.push_palette(tab, theme).await;
        }

        if !view.auto_explore {
            sleep(self.timings.advance_delay()).await;
            self.registry.take_tracker(tab);
            return StepOutcome::Delayed;
        }

        if done.try_recv().is_ok() {
            return StepOutcome::Explored;
        }

        let request = PageRequest::AutoExplore {
            websites: view.candidate_urls.as_ref().clone(),
        };
        match self.host.send_to_page(tab, request).await {
            Delivery::Unreachable => self.resolve_unreachable(tab, url).await,
            Delivery::Delivered(reply) => {
                if !reply.success {
                    debug!(%tab, error = ?reply.error, "auto-explore reply reported failure");
                }
                let deadline = Instant::now() + self.timings.explore_timeout();
                self.registry.arm_timeout(tab, deadline);
                tokio::select! {
                    _ = &mut done => StepOutcome::Explored,
                    _ = sleep_until(deadline) => self.resolve_timeout(tab).await,
                }
            }
        }
    }

    async fn resolve_unreachable(&self, tab: TabId, url: &str) -> StepOutcome {
        match self.registry.take_tracker(tab) {
            Some(tracker) => {
                metrics::record_unreachable();
                self.record_unregistered(&tracker.url).await;
                StepOutcome::Unreachable
            }
            None => {
                debug!(%tab, url = %redact_url(url), "tracker already resolved");
                StepOutcome::Explored
            }
        }
    }

    async fn resolve_timeout(&self, tab: TabId) -> StepOutcome {
        match self.registry.take_tracker(tab) {
            Some(tracker) => {
                metrics::record_timeout();
                warn!(%tab, url = %redact_url(&tracker.url), "auto-explore timed out");
                self.record_unregistered(&tracker.url).await;
                StepOutcome::TimedOut
            }
            // the completion signal won the race
            None => StepOutcome::Explored,
        }
    }

    async fn push_palette(&self, tab: TabId, theme: &Theme) {
        let request = PageRequest::SetPagePalette {
            palette: theme.clone(),
        };
        match timeout(
            self.timings.palette_timeout(),
            self.host.send_to_page(tab, request),
        )
        .await
        {
            Ok(Delivery::Delivered(reply)) if reply.success => {
                debug!(%tab, "palette applied")
            }
            Ok(Delivery::Delivered(reply)) => {
                debug!(%tab, error = ?reply.error, "palette rejected by page")
            }
            Ok(Delivery::Unreachable) => debug!(%tab, "palette push unreachable"),
            Err(_) => warn!(%tab, "palette push timed out"),
        }
    }

    async fn record_unregistered(&self, url: &str) {
        match self.ledger.mark_unregistered(url).await {
            Ok(true) => {
                self.publish(SequenceEvent::SiteUnregistered {
                    url: url.to_string(),
                })
                .await;
            }
            Ok(false) => {}
            Err(err) => {
                let err = SequencerError::from(err);
                warn!(url = %redact_url(url), error = %err, "ledger write failed");
            }
        }
    }

    async fn publish(&self, event: SequenceEvent) {
        if let Some(bus) = self.events.as_ref() {
            if let Err(err) = bus.publish(event).await {
                debug!(error = %err, "sequence event dropped");
            }
        }
    }
}
