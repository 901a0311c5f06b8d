use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::ProbeError;
use crate::model::ExploreReport;
use crate::policy::ProbeTimings;
use crate::ports::{CompletionPort, PagePort};
use crate::runner::{self, ExplorePlan, RuntimeDeps};

pub struct ClickProbeBuilder {
    timings: ProbeTimings,
    page: Option<Arc<dyn PagePort>>,
    completion: Option<Arc<dyn CompletionPort>>,
    seed: Option<u64>,
}

impl ClickProbeBuilder {
    pub fn new(timings: ProbeTimings) -> Self {
        Self {
            timings,
            page: None,
            completion: None,
            seed: None,
        }
    }

    pub fn with_page(mut self, port: Arc<dyn PagePort>) -> Self {
        self.page = Some(port);
        self
    }

    pub fn with_completion(mut self, port: Arc<dyn CompletionPort>) -> Self {
        self.completion = Some(port);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<ClickProbe, ProbeError> {
        let page = self
            .page
            .ok_or_else(|| ProbeError::Page("page port is required".into()))?;
        let completion = self
            .completion
            .ok_or_else(|| ProbeError::Page("completion port is required".into()))?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(ClickProbe {
            timings: self.timings,
            page,
            completion,
            rng: Mutex::new(rng),
        })
    }
}

/// Page-side responder for an auto-explore request.
pub struct ClickProbe {
    timings: ProbeTimings,
    page: Arc<dyn PagePort>,
    completion: Arc<dyn CompletionPort>,
    rng: Mutex<StdRng>,
}

impl ClickProbe {
    pub fn builder(timings: ProbeTimings) -> ClickProbeBuilder {
        ClickProbeBuilder::new(timings)
    }

    /// Enumerates, filters, picks and scrolls. Errors here mean the request
    /// itself failed; nothing was clicked and completion will not be sent.
    pub async fn prepare(&self, candidate_urls: &[String]) -> Result<ExplorePlan, ProbeError> {
        debug!(candidates = candidate_urls.len(), "auto-explore requested");
        runner::prepare(self.page.as_ref(), |visible| {
            if visible.is_empty() {
                None
            } else {
                Some(self.rng.lock().gen_range(0..visible.len()))
            }
        })
        .await
    }

    /// Second half of the pass: delay, marker, click, completion.
    pub async fn finish(&self, plan: ExplorePlan) -> ExploreReport {
        runner::execute(plan, self.deps()).await
    }

    /// Runs the delayed half on its own task.
    pub fn spawn_finish(&self, plan: ExplorePlan) -> tokio::task::JoinHandle<ExploreReport> {
        let deps = self.deps();
        tokio::spawn(runner::execute(plan, deps))
    }

    /// Both halves back to back.
    pub async fn explore(&self, candidate_urls: &[String]) -> Result<ExploreReport, ProbeError> {
        let plan = self.prepare(candidate_urls).await?;
        Ok(self.finish(plan).await)
    }

    fn deps(&self) -> RuntimeDeps {
        RuntimeDeps {
            page: Arc::clone(&self.page),
            completion: Arc::clone(&self.completion),
            timings: self.timings.clone(),
        }
    }
}
