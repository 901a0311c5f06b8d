use std::sync::Arc;
use std::time::Duration;

use click_probe::ProbeTimings;
use page_bridge::{BackgroundRequest, PageRequest};
use palette_styler::{catalog, Theme, STYLE_ELEMENT_ID};
use palette_wander::page_agent::{PageAgent, PageMessenger};
use palette_wander::SimulatedPage;
use tokio::sync::mpsc;
use wander_core_types::TabId;

fn agent(
    url: &str,
    seed: u64,
) -> (
    PageAgent,
    Arc<SimulatedPage>,
    mpsc::Receiver<(TabId, BackgroundRequest)>,
) {
    let (tx, rx) = mpsc::channel(8);
    let page = Arc::new(SimulatedPage::generic(url));
    let agent = PageAgent::new(
        TabId(1),
        Arc::clone(&page),
        Arc::new(PageMessenger::new(TabId(1), tx)),
        ProbeTimings::default(),
        Some(seed),
    )
    .unwrap();
    (agent, page, rx)
}

#[tokio::test]
async fn palette_request_injects_one_stylesheet() {
    let (agent, page, _rx) = agent("https://a.example", 1);
    let theme = catalog::by_index(0).to_theme();

    let reply = agent
        .handle(PageRequest::SetPagePalette { palette: theme })
        .await;
    assert!(reply.success);
    let first = page.style(STYLE_ELEMENT_ID).unwrap();

    let reply = agent
        .handle(PageRequest::SetPagePalette {
            palette: Theme::new(["#ffffff"]),
        })
        .await;
    assert!(reply.success);
    let second = page.style(STYLE_ELEMENT_ID).unwrap();
    assert_ne!(first, second);
}

#[tokio::test(start_paused = true)]
async fn auto_explore_replies_then_reports_completion() {
    let (agent, page, mut rx) = agent("https://a.example", 3);

    let reply = agent
        .handle(PageRequest::AutoExplore {
            websites: vec!["https://a.example".into()],
        })
        .await;
    assert!(reply.success);
    assert!(page.clicks().is_empty());

    let (tab, message) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tab, TabId(1));
    assert_eq!(message, BackgroundRequest::AutoExploreDone);
    assert_eq!(page.clicks().len(), 1);
    let clicked = page.clicks()[0].0;
    assert!((1..=5).contains(&clicked) || clicked == 10);
}

#[tokio::test(start_paused = true)]
async fn marker_is_removed_after_the_click() {
    let (agent, page, mut rx) = agent("https://a.example", 11);

    agent
        .handle(PageRequest::AutoExplore { websites: vec![] })
        .await;
    let _ = rx.recv().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(page.markers(), 0);
}
