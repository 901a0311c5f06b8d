//! Page-context message handler.
//!
//! Receives background requests for one page and routes them to the palette
//! styler or the click probe. Completion of an auto-explore pass travels back
//! through a [`PageMessenger`].

use std::sync::Arc;

use async_trait::async_trait;
use click_probe::{ClickProbe, CompletionPort, PagePort, ProbeTimings};
use page_bridge::{BackgroundRequest, PageReply, PageRequest};
use palette_styler::{PaletteStyler, StyleHost};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wander_core_types::TabId;

use crate::errors::AppResult;

/// Outbound page → background channel, tagged with the sending tab.
pub type Outbound = mpsc::Sender<(TabId, BackgroundRequest)>;

/// Page-side `runtime.sendMessage`.
pub struct PageMessenger {
    tab: TabId,
    outbound: Outbound,
    muted: bool,
}

impl PageMessenger {
    pub fn new(tab: TabId, outbound: Outbound) -> Self {
        Self {
            tab,
            outbound,
            muted: false,
        }
    }

    /// A messenger that swallows completion signals, for pages that answer
    /// requests but never report back.
    pub fn muted(tab: TabId, outbound: Outbound) -> Self {
        Self {
            tab,
            outbound,
            muted: true,
        }
    }

    pub async fn send(&self, request: BackgroundRequest) -> bool {
        self.outbound.send((self.tab, request)).await.is_ok()
    }
}

#[async_trait]
impl CompletionPort for PageMessenger {
    async fn explore_done(&self) {
        if self.muted {
            debug!(tab = %self.tab, "completion suppressed");
            return;
        }
        if !self.send(BackgroundRequest::AutoExploreDone).await {
            warn!(tab = %self.tab, "background gone; completion lost");
        }
    }
}

pub struct PageAgent {
    tab: TabId,
    styles: Arc<dyn StyleHost>,
    styler: PaletteStyler,
    probe: ClickProbe,
}

impl PageAgent {
    pub fn new<P>(
        tab: TabId,
        page: Arc<P>,
        completion: Arc<dyn CompletionPort>,
        timings: ProbeTimings,
        seed: Option<u64>,
    ) -> AppResult<Self>
    where
        P: PagePort + StyleHost + 'static,
    {
        let page_port: Arc<dyn PagePort> = page.clone();
        let mut builder = ClickProbe::builder(timings)
            .with_page(page_port)
            .with_completion(completion);
        if let Some(seed) = seed {
            builder = builder.with_seed(seed);
        }
        Ok(Self {
            tab,
            styles: page,
            styler: PaletteStyler::new(),
            probe: builder.build()?,
        })
    }

    /// Handles one request and produces the synchronous reply. The delayed
    /// half of an auto-explore pass keeps running after the reply.
    pub async fn handle(&self, request: PageRequest) -> PageReply {
        debug!(tab = %self.tab, op = request.op(), "page request");
        match request {
            PageRequest::SetPagePalette { palette } => {
                match self.styler.apply_theme(self.styles.as_ref(), &palette).await {
                    Ok(_) => PageReply::ok(),
                    Err(err) => {
                        warn!(tab = %self.tab, error = %err, "palette injection failed");
                        PageReply::failed(err.to_string())
                    }
                }
            }
            PageRequest::AutoExplore { websites } => match self.probe.prepare(&websites).await {
                Ok(plan) => {
                    self.probe.spawn_finish(plan);
                    PageReply::ok()
                }
                Err(err) => {
                    warn!(tab = %self.tab, error = %err, "auto-explore failed");
                    PageReply::failed(err.to_string())
                }
            },
        }
    }
}
