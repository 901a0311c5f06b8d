use std::sync::Arc;

use tracing::{debug, instrument, warn};
use wander_core_types::ElementId;

use crate::errors::ProbeError;
use crate::model::{ElementSnapshot, ExploreReport};
use crate::policy::ProbeTimings;
use crate::ports::{CompletionPort, PagePort};

/// Result of the synchronous half of an explore pass: the target has been
/// chosen and scrolled into view, nothing has been clicked yet.
#[derive(Debug)]
pub struct ExplorePlan {
    pub(crate) candidates: usize,
    pub(crate) visible: usize,
    pub(crate) target: Option<ElementSnapshot>,
}

impl ExplorePlan {
    pub fn target(&self) -> Option<ElementId> {
        self.target.as_ref().map(|element| element.id)
    }
}

pub struct RuntimeDeps {
    pub page: Arc<dyn PagePort>,
    pub completion: Arc<dyn CompletionPort>,
    pub timings: ProbeTimings,
}

/// Waits, marks, clicks, then signals completion. Completion is signalled
/// exactly once even when the page refuses the click.
#[instrument(skip_all, fields(target = ?plan.target()))]
pub async fn execute(plan: ExplorePlan, deps: RuntimeDeps) -> ExploreReport {
    let mut report = ExploreReport {
        candidates: plan.candidates,
        visible: plan.visible,
        ..ExploreReport::default()
    };

    let Some(target) = plan.target else {
        debug!("no visible interactive element");
        deps.completion.explore_done().await;
        return report;
    };

    tokio::time::sleep(deps.timings.scroll_delay()).await;

    report.marker_shown = show_marker(&deps, target.id).await;

    match deps.page.click(target.id).await {
        Ok(()) => report.clicked = Some(target.id),
        Err(err) => warn!(element = %target.id, ?err, "synthetic click failed"),
    }

    deps.completion.explore_done().await;
    report
}

async fn show_marker(deps: &RuntimeDeps, element: ElementId) -> bool {
    let rect = match deps.page.element_rect(element).await {
        Ok(rect) => rect,
        Err(err) => {
            warn!(%element, ?err, "marker skipped");
            return false;
        }
    };
    let (x, y) = rect.center();
    match deps.page.show_marker(x, y).await {
        Ok(marker) => {
            let page = Arc::clone(&deps.page);
            let linger = deps.timings.marker();
            tokio::spawn(async move {
                tokio::time::sleep(linger).await;
                page.remove_marker(marker).await;
            });
            true
        }
        Err(err) => {
            warn!(%element, ?err, "marker failed");
            false
        }
    }
}

pub(crate) async fn prepare(
    page: &dyn PagePort,
    pick: impl FnOnce(&[&ElementSnapshot]) -> Option<usize>,
) -> Result<ExplorePlan, ProbeError> {
    let elements = page.interactive_elements().await?;
    let visible = crate::select::clickable(&elements);
    let target = pick(&visible).and_then(|index| visible.get(index)).map(|el| (*el).clone());
    if let Some(target) = target.as_ref() {
        page.scroll_into_view(target.id).await?;
    }
    Ok(ExplorePlan {
        candidates: elements.len(),
        visible: visible.len(),
        target,
    })
}
