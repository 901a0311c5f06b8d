use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use palette_wander::simulate::{run_simulation, SimulationPlan, SimulationReport};
use palette_wander::trending::HackerNewsSource;
use palette_wander::{BrowserConfig, SiteBehavior};
use wander_sequencer::CandidateSource;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct SimulateArgs {
    /// Tabs to open per sequence (values below 1 count as 1)
    #[arg(short, long, default_value_t = 3, allow_negative_numbers = true)]
    pub repetitions: i64,

    /// Click a random element on each page before moving on
    #[arg(short, long)]
    pub auto_explore: bool,

    /// Candidate website (repeatable); defaults to the saved or configured list
    #[arg(short, long = "website", value_name = "URL")]
    pub websites: Vec<String>,

    /// Replace the candidates with trending story links when available
    #[arg(long)]
    pub trending: bool,

    /// Palette applied to every opened page (name or index)
    #[arg(short, long, value_name = "NAME|INDEX")]
    pub palette: Option<String>,

    /// URL whose tab has no page context
    #[arg(long = "restricted", value_name = "URL")]
    pub restricted: Vec<String>,

    /// URL whose page never reports auto-explore completion
    #[arg(long = "silent", value_name = "URL")]
    pub silent: Vec<String>,

    /// URL whose tab cannot be opened
    #[arg(long = "refuse", value_name = "URL")]
    pub refuse: Vec<String>,

    /// Concurrent sequences to start
    #[arg(long, default_value_t = 1)]
    pub sequences: usize,

    /// Simulated page load time
    #[arg(long, default_value = "250ms", value_parser = humantime::parse_duration)]
    pub load_delay: Duration,

    /// Seed for reproducible URL and element choices
    #[arg(long)]
    pub seed: Option<u64>,
}

pub async fn cmd_simulate(
    args: SimulateArgs,
    ctx: &CliContext,
    output: OutputFormat,
) -> Result<()> {
    let app = ctx.app_context().await?;

    let websites = if args.websites.is_empty() {
        app.websites().await.context("failed to read saved websites")?
    } else {
        args.websites.clone()
    };
    let theme = app
        .page_theme(args.palette.as_deref())
        .await
        .context("failed to resolve page palette")?;

    let use_trending = args.trending || ctx.config().trending.enabled;
    let candidates: Option<Arc<dyn CandidateSource>> = if use_trending {
        let source = HackerNewsSource::from_config(&ctx.config().trending)
            .context("failed to build trending client")?;
        Some(Arc::new(source))
    } else {
        None
    };

    let mut browser = BrowserConfig {
        load_delay: args.load_delay,
        probe: ctx.config().probe.clone(),
        seed: args.seed,
        ..BrowserConfig::default()
    };
    for url in &args.restricted {
        browser = browser.with_behavior(url.clone(), SiteBehavior::Restricted);
    }
    for url in &args.silent {
        browser = browser.with_behavior(url.clone(), SiteBehavior::Silent);
    }
    for url in &args.refuse {
        browser = browser.with_behavior(url.clone(), SiteBehavior::FailsToOpen);
    }

    let plan = SimulationPlan {
        sequences: args.sequences,
        repetitions: args.repetitions,
        auto_explore: args.auto_explore,
        websites,
        use_trending,
        theme,
        browser,
        seed: args.seed,
    };
    let report = run_simulation(&app, plan, candidates)
        .await
        .context("simulation failed")?;

    if !emit_structured(&output, &report)? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Simulation summary");
    println!("==================");
    for summary in &report.sequences {
        let status = if !summary.started {
            "not started".to_string()
        } else if let Some(reason) = summary.abandoned.as_ref() {
            format!("abandoned ({reason})")
        } else {
            "finished".to_string()
        };
        println!(
            "sequence {}  {}  tabs={}{}",
            summary.sequence,
            status,
            summary.tabs_opened,
            if summary.used_trending { "  [trending]" } else { "" }
        );
        for (outcome, count) in &summary.outcomes {
            println!("    {outcome:<12} {count}");
        }
    }

    println!();
    println!("Tabs opened: {}", report.tabs.len());
    for record in &report.tabs {
        println!("  {}  {}  ({:?})", record.tab, record.url, record.behavior);
    }

    println!();
    if report.newly_unregistered.is_empty() {
        println!("No new unregistered sites");
    } else {
        println!("Newly unregistered sites:");
        for url in &report.newly_unregistered {
            println!("  {url}");
        }
    }
    println!("Ledger size: {}", report.ledger.len());
}
