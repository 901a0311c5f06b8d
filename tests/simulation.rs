use std::sync::Arc;
use std::time::Duration;

use palette_styler::catalog;
use palette_wander::simulate::{run_simulation, SimulationPlan};
use palette_wander::{AppContext, BrowserConfig, Config, SiteBehavior};
use site_ledger::{KeyValueStore, MemoryStore};
use wander_sequencer::{CandidateSource, StaticCandidates};

fn memory_context() -> AppContext {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    AppContext::with_store(Config::default(), store, None)
}

#[tokio::test(start_paused = true)]
async fn opens_one_tab_per_repetition() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 3,
        websites: vec!["https://a.example".into(), "https://b.example".into()],
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert_eq!(report.tabs.len(), 3);
    assert_eq!(report.sequences.len(), 1);
    let summary = &report.sequences[0];
    assert!(summary.started);
    assert_eq!(summary.tabs_opened, 3);
    assert_eq!(summary.outcomes.get("delayed"), Some(&3));
    assert!(report.ledger.is_empty());
}

#[tokio::test(start_paused = true)]
async fn restricted_sites_land_in_the_ledger() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 2,
        auto_explore: true,
        websites: vec!["chrome://settings".into()],
        browser: BrowserConfig::default().with_behavior("chrome://settings", SiteBehavior::Restricted),
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert_eq!(report.tabs.len(), 2);
    assert_eq!(report.sequences[0].outcomes.get("unreachable"), Some(&2));
    assert_eq!(report.ledger, vec!["chrome://settings".to_string()]);
    assert_eq!(report.newly_unregistered, vec!["chrome://settings".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn auto_explore_completes_on_reachable_pages() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 2,
        auto_explore: true,
        websites: vec!["https://reachable.example".into()],
        theme: Some(catalog::by_index(1).to_theme()),
        seed: Some(7),
        browser: BrowserConfig {
            seed: Some(7),
            ..BrowserConfig::default()
        },
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert_eq!(report.sequences[0].outcomes.get("explored"), Some(&2));
    assert!(report.sequences[0].abandoned.is_none());
}

#[tokio::test(start_paused = true)]
async fn silent_pages_time_out_and_are_recorded() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 1,
        auto_explore: true,
        websites: vec!["https://quiet.example".into()],
        browser: BrowserConfig::default().with_behavior("https://quiet.example", SiteBehavior::Silent),
        ..SimulationPlan::default()
    };

    let started = tokio::time::Instant::now();
    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(8000));
    assert_eq!(report.sequences[0].outcomes.get("timed_out"), Some(&1));
    assert_eq!(report.ledger, vec!["https://quiet.example".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn refused_tab_abandons_the_sequence() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 4,
        websites: vec!["https://nope.example".into()],
        browser: BrowserConfig::default().with_behavior("https://nope.example", SiteBehavior::FailsToOpen),
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert!(report.tabs.is_empty());
    assert!(report.sequences[0].abandoned.is_some());
}

#[tokio::test(start_paused = true)]
async fn trending_candidates_replace_the_website_list() {
    let ctx = memory_context();
    let trending: Arc<dyn CandidateSource> =
        Arc::new(StaticCandidates(vec!["https://trending.example/story".into()]));
    let plan = SimulationPlan {
        repetitions: 2,
        use_trending: true,
        websites: vec!["https://fallback.example".into()],
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, Some(trending)).await.unwrap();

    assert!(report.sequences[0].used_trending);
    assert!(report
        .tabs
        .iter()
        .all(|tab| tab.url == "https://trending.example/story"));
}

#[tokio::test(start_paused = true)]
async fn empty_website_list_is_refused() {
    let ctx = memory_context();
    let plan = SimulationPlan {
        repetitions: 2,
        ..SimulationPlan::default()
    };

    let report = run_simulation(&ctx, plan, None).await.unwrap();

    assert!(!report.sequences[0].started);
    assert!(report.tabs.is_empty());
}
