//! In-memory browser used by the `simulate` command and integration tests.
//!
//! Tabs are scripted per URL: reachable pages run a [`PageAgent`], restricted
//! pages have no page context, silent pages answer but never report back, and
//! some URLs refuse to open.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use click_probe::{
    ClickListener, ElementSnapshot, MarkerId, PagePort, ProbeError, ProbeTimings, Rect,
    ReloadWatchdog,
};
use dashmap::DashMap;
use page_bridge::{
    BackgroundRequest, BridgeError, Delivery, LoadRegistry, LoadWatch, PageReply, PageRequest,
    TabHost,
};
use palette_styler::{StyleError, StyleHost};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};
use wander_core_types::{ElementId, TabId};

use crate::page_agent::{Outbound, PageAgent, PageMessenger};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteBehavior {
    #[default]
    Reachable,
    /// No page context (browser-internal or store pages).
    Restricted,
    /// Page answers requests but never signals completion.
    Silent,
    FailsToOpen,
}

#[derive(Clone, Debug)]
pub struct BrowserConfig {
    pub load_delay: Duration,
    pub probe: ProbeTimings,
    pub behaviors: HashMap<String, SiteBehavior>,
    /// Seeds each page's probe RNG (offset by tab id) for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            load_delay: Duration::from_millis(250),
            probe: ProbeTimings::default(),
            behaviors: HashMap::new(),
            seed: None,
        }
    }
}

impl BrowserConfig {
    pub fn with_behavior(mut self, url: impl Into<String>, behavior: SiteBehavior) -> Self {
        self.behaviors.insert(url.into(), behavior);
        self
    }

    fn behavior(&self, url: &str) -> SiteBehavior {
        self.behaviors.get(url).copied().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TabRecord {
    pub tab: TabId,
    pub url: String,
    pub behavior: SiteBehavior,
}

struct OpenTab {
    page: Arc<SimulatedPage>,
    agent: Option<Arc<PageAgent>>,
}

pub struct SimulatedBrowser {
    config: BrowserConfig,
    next_tab: AtomicU64,
    loads: Arc<LoadRegistry>,
    tabs: DashMap<TabId, OpenTab>,
    history: Mutex<Vec<TabRecord>>,
    outbound: Outbound,
}

impl SimulatedBrowser {
    /// Returns the browser and the receiving end of page → background messages.
    pub fn new(
        config: BrowserConfig,
        capacity: usize,
    ) -> (Arc<Self>, mpsc::Receiver<(TabId, BackgroundRequest)>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        let browser = Arc::new(Self {
            config,
            next_tab: AtomicU64::new(1),
            loads: LoadRegistry::new(),
            tabs: DashMap::new(),
            history: Mutex::new(Vec::new()),
            outbound,
        });
        (browser, rx)
    }

    pub fn history(&self) -> Vec<TabRecord> {
        self.history.lock().clone()
    }

    pub fn page(&self, tab: TabId) -> Option<Arc<SimulatedPage>> {
        self.tabs.get(&tab).map(|entry| Arc::clone(&entry.page))
    }

    pub fn pending_load_watches(&self) -> usize {
        self.loads.total_active()
    }

    /// Closes a tab; pending load observers see the subscription drop.
    pub fn close_tab(&self, tab: TabId) -> bool {
        self.loads.discard(tab);
        self.tabs.remove(&tab).is_some()
    }

    fn open_page(&self, tab: TabId, url: &str, behavior: SiteBehavior) -> Result<OpenTab, BridgeError> {
        let page = Arc::new(SimulatedPage::generic(url));
        let agent = match behavior {
            SiteBehavior::Restricted => None,
            SiteBehavior::Reachable | SiteBehavior::Silent => {
                let messenger = if behavior == SiteBehavior::Silent {
                    PageMessenger::muted(tab, self.outbound.clone())
                } else {
                    PageMessenger::new(tab, self.outbound.clone())
                };
                let page_port: Arc<dyn PagePort> = page.clone();
                page.add_click_listener(Arc::new(ReloadWatchdog::new(
                    page_port,
                    self.config.probe.clone(),
                )));
                let seed = self.config.seed.map(|seed| seed.wrapping_add(tab.0));
                let agent = PageAgent::new(
                    tab,
                    Arc::clone(&page),
                    Arc::new(messenger),
                    self.config.probe.clone(),
                    seed,
                )
                .map_err(|err| BridgeError::Internal(err.to_string()))?;
                Some(Arc::new(agent))
            }
            SiteBehavior::FailsToOpen => {
                return Err(BridgeError::TabCreation(format!("refused to open {url}")))
            }
        };
        Ok(OpenTab { page, agent })
    }
}

#[async_trait]
impl TabHost for SimulatedBrowser {
    async fn create_tab(&self, url: &str) -> Result<TabId, BridgeError> {
        let behavior = self.config.behavior(url);
        let tab = TabId(self.next_tab.fetch_add(1, Ordering::Relaxed));
        let open = self.open_page(tab, url, behavior)?;
        self.tabs.insert(tab, open);
        self.history.lock().push(TabRecord {
            tab,
            url: url.to_string(),
            behavior,
        });
        info!(%tab, url = %url, ?behavior, "tab created");

        let loads = Arc::clone(&self.loads);
        let delay = self.config.load_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let fired = loads.notify_complete(tab);
            debug!(%tab, fired, "load complete");
        });
        Ok(tab)
    }

    fn watch_load(&self, tab: TabId) -> LoadWatch {
        self.loads.watch(tab)
    }

    async fn send_to_page(&self, tab: TabId, request: PageRequest) -> Delivery<PageReply> {
        let target = self.tabs.get(&tab).and_then(|entry| {
            entry
                .agent
                .as_ref()
                .map(|agent| (Arc::clone(&entry.page), Arc::clone(agent)))
        });
        let Some((page, agent)) = target else {
            return Delivery::Unreachable;
        };
        page.record_request();
        Delivery::Delivered(agent.handle(request).await)
    }
}

/// Minimal document model: a fixed set of elements plus bookkeeping for
/// styles, markers, clicks and reloads.
pub struct SimulatedPage {
    url: Mutex<String>,
    elements: Vec<ElementSnapshot>,
    node_count: AtomicUsize,
    styles: Mutex<BTreeMap<String, String>>,
    next_marker: AtomicU64,
    markers: Mutex<Vec<MarkerId>>,
    clicks: Mutex<Vec<ElementId>>,
    reloads: AtomicUsize,
    requests: AtomicUsize,
    listeners: Mutex<Vec<Arc<dyn ClickListener>>>,
}

impl SimulatedPage {
    pub fn new(url: &str, elements: Vec<ElementSnapshot>, node_count: usize) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
            elements,
            node_count: AtomicUsize::new(node_count),
            styles: Mutex::new(BTreeMap::new()),
            next_marker: AtomicU64::new(1),
            markers: Mutex::new(Vec::new()),
            clicks: Mutex::new(Vec::new()),
            reloads: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// A small page with links, buttons and a few elements that must never
    /// be picked (hidden, zero-sized, inert, or plain children of buttons).
    pub fn generic(url: &str) -> Self {
        let rect = |row: u64| Rect::new(20.0, 40.0 * row as f64, 120.0, 28.0);
        let elements = vec![
            ElementSnapshot::new(ElementId(1), "a", rect(1)),
            ElementSnapshot::new(ElementId(2), "button", rect(2)),
            ElementSnapshot::new(ElementId(3), "div", rect(3)).with_role("button"),
            ElementSnapshot::new(ElementId(4), "input", rect(4)).with_input_type("submit"),
            ElementSnapshot::new(ElementId(5), "span", rect(5)).with_class("btn"),
            ElementSnapshot::new(ElementId(6), "button", rect(6)).with_display("none"),
            ElementSnapshot::new(ElementId(7), "a", Rect::new(0.0, 0.0, 0.0, 0.0)),
            ElementSnapshot::new(ElementId(8), "button", rect(8)).with_pointer_events("none"),
            ElementSnapshot::new(ElementId(9), "a", rect(9)).with_visibility("hidden"),
            ElementSnapshot::new(ElementId(10), "button", rect(10)).without_reload(),
            ElementSnapshot::new(ElementId(11), "span", rect(2)).with_parent(ElementId(2)),
            ElementSnapshot::new(ElementId(12), "span", rect(10)).with_parent(ElementId(10)),
            ElementSnapshot::new(ElementId(13), "em", rect(1)).with_parent(ElementId(1)),
        ];
        Self::new(url, elements, 240)
    }

    pub fn url(&self) -> String {
        self.url.lock().clone()
    }

    pub fn style(&self, id: &str) -> Option<String> {
        self.styles.lock().get(id).cloned()
    }

    pub fn clicks(&self) -> Vec<ElementId> {
        self.clicks.lock().clone()
    }

    pub fn markers(&self) -> usize {
        self.markers.lock().len()
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Registers an observer for every click on this page, whatever its source.
    pub fn add_click_listener(&self, listener: Arc<dyn ClickListener>) {
        self.listeners.lock().push(listener);
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn find(&self, element: ElementId) -> Result<&ElementSnapshot, ProbeError> {
        self.elements
            .iter()
            .find(|candidate| candidate.id == element)
            .ok_or_else(|| ProbeError::Detached(element.to_string()))
    }

    /// The element followed by its ancestors, innermost first.
    fn path(&self, element: ElementId) -> Result<Vec<ElementSnapshot>, ProbeError> {
        let mut path = vec![self.find(element)?.clone()];
        while let Some(parent) = path.last().and_then(|last| last.parent) {
            // parent links come from page fixtures; stop on a cycle
            if path.len() > self.elements.len() {
                break;
            }
            match self.elements.iter().find(|candidate| candidate.id == parent) {
                Some(found) => path.push(found.clone()),
                None => break,
            }
        }
        Ok(path)
    }
}

#[async_trait]
impl PagePort for SimulatedPage {
    async fn interactive_elements(&self) -> Result<Vec<ElementSnapshot>, ProbeError> {
        Ok(self.elements.clone())
    }

    async fn scroll_into_view(&self, element: ElementId) -> Result<(), ProbeError> {
        self.find(element).map(|_| ())
    }

    async fn element_rect(&self, element: ElementId) -> Result<Rect, ProbeError> {
        self.find(element).map(|found| found.rect)
    }

    async fn show_marker(&self, _x: f64, _y: f64) -> Result<MarkerId, ProbeError> {
        let marker = MarkerId(self.next_marker.fetch_add(1, Ordering::Relaxed));
        self.markers.lock().push(marker);
        Ok(marker)
    }

    async fn remove_marker(&self, marker: MarkerId) {
        self.markers.lock().retain(|existing| *existing != marker);
    }

    async fn click(&self, element: ElementId) -> Result<(), ProbeError> {
        let path = self.path(element)?;
        self.clicks.lock().push(element);

        // listeners see the page before the click takes effect
        let listeners = self.listeners.lock().clone();
        for listener in &listeners {
            listener.on_click(&path).await;
        }

        // links navigate, everything else is inert
        if let Some(link) = path.iter().find(|el| el.tag.eq_ignore_ascii_case("a")) {
            let mut url = self.url.lock();
            let next = format!("{}#{}", url.split('#').next().unwrap_or(""), link.id.0);
            *url = next;
        }
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.url()
    }

    async fn element_count(&self) -> usize {
        self.node_count.load(Ordering::SeqCst)
    }

    async fn reload(&self) -> Result<(), ProbeError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl StyleHost for SimulatedPage {
    async fn remove_style(&self, id: &str) -> Result<bool, StyleError> {
        Ok(self.styles.lock().remove(id).is_some())
    }

    async fn insert_style(&self, id: &str, css: &str) -> Result<(), StyleError> {
        self.styles.lock().insert(id.to_string(), css.to_string());
        Ok(())
    }
}
