use anyhow::{Context, Result};
use clap::Args;
use palette_wander::trending::HackerNewsSource;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct TrendingArgs {
    /// Stories to inspect (defaults to the configured limit)
    #[arg(long)]
    pub limit: Option<usize>,
}

pub async fn cmd_trending(
    args: TrendingArgs,
    ctx: &CliContext,
    output: OutputFormat,
) -> Result<()> {
    let mut config = ctx.config().trending.clone();
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    let source = HackerNewsSource::from_config(&config).context("failed to build client")?;
    let urls = source
        .top_story_urls()
        .await
        .with_context(|| format!("failed to fetch trending stories from {}", config.endpoint))?;

    if emit_structured(&output, &urls)? {
        return Ok(());
    }
    if urls.is_empty() {
        println!("No trending links available");
    }
    for url in urls {
        println!("{url}");
    }
    Ok(())
}
