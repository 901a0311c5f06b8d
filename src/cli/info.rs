use anyhow::Result;
use serde::Serialize;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Serialize)]
struct BuildInfo {
    version: &'static str,
    build_date: &'static str,
    git_hash: &'static str,
    git_branch: &'static str,
    config_path: String,
}

pub fn cmd_info(ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let info = BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        build_date: env!("BUILD_DATE"),
        git_hash: env!("GIT_HASH"),
        git_branch: env!("GIT_BRANCH"),
        config_path: ctx.config_path().display().to_string(),
    };
    if emit_structured(&output, &info)? {
        return Ok(());
    }

    println!("palette-wander {}", info.version);
    println!("Built:   {}", info.build_date);
    println!("Commit:  {} ({})", info.git_hash, info.git_branch);
    println!("Config:  {}", info.config_path);
    println!(
        "Timings: advance {}ms, explore timeout {}ms, palette timeout {}ms",
        ctx.config().timings.advance_delay_ms,
        ctx.config().timings.explore_timeout_ms,
        ctx.config().timings.palette_timeout_ms
    );
    Ok(())
}
