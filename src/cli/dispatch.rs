use super::env::CliArgs;
use super::info::cmd_info;
use super::ledger::cmd_ledger;
use super::palettes::{cmd_css, cmd_palettes};
use super::settings::cmd_settings;
use super::simulate::cmd_simulate;
use super::trending::cmd_trending;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    let output = cli.output.clone();
    match cli.command.clone() {
        Commands::Simulate(args) => cmd_simulate(args, ctx, output).await,
        Commands::Palettes => cmd_palettes(output),
        Commands::Css(args) => cmd_css(args),
        Commands::Ledger(args) => cmd_ledger(args, ctx, output).await,
        Commands::Settings(args) => cmd_settings(args, ctx, output).await,
        Commands::Trending(args) => cmd_trending(args, ctx, output).await,
        Commands::Info => cmd_info(ctx, output),
    }
}
