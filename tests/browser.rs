use std::sync::Arc;
use std::time::Duration;

use click_probe::PagePort;
use page_bridge::TabHost;
use palette_wander::{BrowserConfig, SimulatedBrowser, SimulatedPage, SiteBehavior};
use wander_core_types::ElementId;

async fn open(url: &str, behavior: SiteBehavior) -> Arc<SimulatedPage> {
    let (browser, _inbound) =
        SimulatedBrowser::new(BrowserConfig::default().with_behavior(url, behavior), 8);
    let tab = browser.create_tab(url).await.unwrap();
    browser.page(tab).unwrap()
}

#[tokio::test(start_paused = true)]
async fn user_click_inside_a_button_reloads_an_unchanged_page() {
    let page = open("https://a.example/", SiteBehavior::Reachable).await;

    // span nested in button 2, clicked directly rather than by auto-explore
    page.click(ElementId(11)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(page.reloads(), 1);
}

#[tokio::test(start_paused = true)]
async fn opted_out_and_navigating_clicks_do_not_reload() {
    let page = open("https://a.example/", SiteBehavior::Reachable).await;

    page.click(ElementId(12)).await.unwrap();
    page.click(ElementId(13)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(page.reloads(), 0);
    assert_eq!(page.url(), "https://a.example/#1");
}

#[tokio::test(start_paused = true)]
async fn pages_without_a_content_context_are_not_watched() {
    let page = open("chrome://settings", SiteBehavior::Restricted).await;

    page.click(ElementId(2)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    assert_eq!(page.reloads(), 0);
}
