use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use click_probe::{
    ClickListener, ClickProbe, CompletionPort, ElementSnapshot, MarkerId, PagePort, ProbeError,
    ProbeTimings, Rect, ReloadVerdict, ReloadWatchdog,
};
use parking_lot::Mutex;
use wander_core_types::ElementId;

#[derive(Default)]
struct FakePage {
    elements: Vec<ElementSnapshot>,
    url: Mutex<String>,
    count: AtomicUsize,
    clicks: Mutex<Vec<ElementId>>,
    scrolled: Mutex<Vec<ElementId>>,
    markers: Mutex<Vec<MarkerId>>,
    reloads: AtomicUsize,
    fail_enumerate: bool,
    fail_marker: bool,
}

#[async_trait]
impl PagePort for FakePage {
    async fn interactive_elements(&self) -> Result<Vec<ElementSnapshot>, ProbeError> {
        if self.fail_enumerate {
            return Err(ProbeError::Enumerate("document detached".into()));
        }
        Ok(self.elements.clone())
    }

    async fn scroll_into_view(&self, element: ElementId) -> Result<(), ProbeError> {
        self.scrolled.lock().push(element);
        Ok(())
    }

    async fn element_rect(&self, element: ElementId) -> Result<Rect, ProbeError> {
        self.elements
            .iter()
            .find(|candidate| candidate.id == element)
            .map(|candidate| candidate.rect)
            .ok_or_else(|| ProbeError::Detached(element.to_string()))
    }

    async fn show_marker(&self, _x: f64, _y: f64) -> Result<MarkerId, ProbeError> {
        if self.fail_marker {
            return Err(ProbeError::Page("no body".into()));
        }
        let mut markers = self.markers.lock();
        let marker = MarkerId(markers.len() as u64 + 1);
        markers.push(marker);
        Ok(marker)
    }

    async fn remove_marker(&self, marker: MarkerId) {
        self.markers.lock().retain(|existing| *existing != marker);
    }

    async fn click(&self, element: ElementId) -> Result<(), ProbeError> {
        self.clicks.lock().push(element);
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.url.lock().clone()
    }

    async fn element_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    async fn reload(&self) -> Result<(), ProbeError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct CountingCompletion(AtomicUsize);

#[async_trait]
impl CompletionPort for CountingCompletion {
    async fn explore_done(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn button(id: u64) -> ElementSnapshot {
    ElementSnapshot::new(ElementId(id), "button", Rect::new(10.0, 10.0, 80.0, 24.0))
}

fn explorer(page: Arc<FakePage>, done: Arc<CountingCompletion>) -> ClickProbe {
    ClickProbe::builder(ProbeTimings::default())
        .with_page(page)
        .with_completion(done)
        .with_seed(7)
        .build()
        .expect("probe")
}

#[tokio::test(start_paused = true)]
async fn clicks_one_visible_element_then_signals() {
    let page = Arc::new(FakePage {
        elements: vec![
            button(1).with_display("none"),
            button(2),
            ElementSnapshot::new(ElementId(3), "div", Rect::new(0.0, 0.0, 10.0, 10.0)),
        ],
        ..FakePage::default()
    });
    let done = Arc::new(CountingCompletion::default());
    let report = explorer(page.clone(), done.clone())
        .explore(&["https://example.com".into()])
        .await
        .expect("explore");

    assert_eq!(report.candidates, 3);
    assert_eq!(report.visible, 1);
    assert_eq!(report.clicked, Some(ElementId(2)));
    assert!(report.marker_shown);
    assert_eq!(*page.scrolled.lock(), vec![ElementId(2)]);
    assert_eq!(*page.clicks.lock(), vec![ElementId(2)]);
    assert_eq!(done.0.load(Ordering::SeqCst), 1);

    // marker outlives the completion signal, then removes itself
    assert_eq!(page.markers.lock().len(), 1);
    tokio::time::sleep(Duration::from_millis(750)).await;
    assert!(page.markers.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_page_signals_without_clicking() {
    let page = Arc::new(FakePage {
        elements: vec![button(1).with_visibility("hidden")],
        ..FakePage::default()
    });
    let done = Arc::new(CountingCompletion::default());
    let report = explorer(page.clone(), done.clone())
        .explore(&[])
        .await
        .expect("explore");

    assert_eq!(report.clicked, None);
    assert!(page.clicks.lock().is_empty());
    assert!(page.scrolled.lock().is_empty());
    assert_eq!(done.0.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn marker_failure_does_not_block_completion() {
    let page = Arc::new(FakePage {
        elements: vec![button(4)],
        fail_marker: true,
        ..FakePage::default()
    });
    let done = Arc::new(CountingCompletion::default());
    let report = explorer(page.clone(), done.clone())
        .explore(&[])
        .await
        .expect("explore");

    assert!(!report.marker_shown);
    assert_eq!(report.clicked, Some(ElementId(4)));
    assert_eq!(done.0.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn enumeration_failure_surfaces_without_completion() {
    let page = Arc::new(FakePage {
        fail_enumerate: true,
        ..FakePage::default()
    });
    let done = Arc::new(CountingCompletion::default());
    let result = explorer(page, done.clone()).prepare(&[]).await;

    assert!(matches!(result, Err(ProbeError::Enumerate(_))));
    assert_eq!(done.0.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn seeded_runs_pick_the_same_target() {
    let elements: Vec<_> = (1..=20).map(button).collect();
    let first = Arc::new(FakePage {
        elements: elements.clone(),
        ..FakePage::default()
    });
    let second = Arc::new(FakePage {
        elements,
        ..FakePage::default()
    });
    let done = Arc::new(CountingCompletion::default());

    let a = explorer(first, done.clone()).prepare(&[]).await.expect("plan");
    let b = explorer(second, done).prepare(&[]).await.expect("plan");
    assert_eq!(a.target(), b.target());
}

#[tokio::test(start_paused = true)]
async fn watchdog_reloads_when_nothing_changed() {
    let page = Arc::new(FakePage {
        url: Mutex::new("https://example.com/".into()),
        count: AtomicUsize::new(500),
        ..FakePage::default()
    });
    let watchdog = ReloadWatchdog::new(page.clone(), ProbeTimings::default());

    let handle = watchdog.observe_click(&[button(1)]).await.expect("watched");
    page.count.store(503, Ordering::SeqCst);
    assert_eq!(handle.await.expect("join"), ReloadVerdict::Reloaded);
    assert_eq!(page.reloads.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn watchdog_leaves_changed_pages_alone() {
    let page = Arc::new(FakePage {
        url: Mutex::new("https://example.com/".into()),
        count: AtomicUsize::new(500),
        ..FakePage::default()
    });
    let watchdog = ReloadWatchdog::new(page.clone(), ProbeTimings::default());

    let grew = watchdog.observe_click(&[button(1)]).await.expect("watched");
    page.count.store(520, Ordering::SeqCst);
    assert_eq!(grew.await.expect("join"), ReloadVerdict::Changed);

    let moved = watchdog.observe_click(&[button(1)]).await.expect("watched");
    *page.url.lock() = "https://example.com/next".into();
    assert_eq!(moved.await.expect("join"), ReloadVerdict::Navigated);

    assert_eq!(page.reloads.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn watchdog_honours_opt_out_and_non_interactive_targets() {
    let page = Arc::new(FakePage::default());
    let watchdog = ReloadWatchdog::new(page.clone(), ProbeTimings::default());

    assert!(watchdog
        .observe_click(&[button(1).without_reload()])
        .await
        .is_none());
    let plain = ElementSnapshot::new(ElementId(2), "p", Rect::new(0.0, 0.0, 5.0, 5.0));
    assert!(watchdog.observe_click(&[plain]).await.is_none());

    // the opt-out sits on the button, the click lands on its label
    let label = ElementSnapshot::new(ElementId(3), "span", Rect::new(0.0, 0.0, 5.0, 5.0))
        .with_parent(ElementId(4));
    assert!(watchdog
        .observe_click(&[label, button(4).without_reload()])
        .await
        .is_none());
}

#[tokio::test(start_paused = true)]
async fn click_inside_a_button_is_watched_through_the_listener() {
    let page = Arc::new(FakePage {
        url: Mutex::new("https://example.com/".into()),
        count: AtomicUsize::new(120),
        ..FakePage::default()
    });
    let watchdog = ReloadWatchdog::new(page.clone(), ProbeTimings::default());

    let icon = ElementSnapshot::new(ElementId(9), "i", Rect::new(0.0, 0.0, 8.0, 8.0))
        .with_parent(ElementId(5));
    let wrapper = ElementSnapshot::new(ElementId(5), "span", Rect::new(0.0, 0.0, 20.0, 8.0))
        .with_parent(ElementId(6));
    watchdog.on_click(&[icon, wrapper, button(6)]).await;

    tokio::time::sleep(Duration::from_millis(899)).await;
    assert_eq!(page.reloads.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(page.reloads.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn watchdog_ignores_clicks_once_the_page_is_dropped() {
    let page = Arc::new(FakePage::default());
    let watchdog = ReloadWatchdog::new(page.clone(), ProbeTimings::default());
    drop(page);
    assert!(watchdog.observe_click(&[button(1)]).await.is_none());
}
