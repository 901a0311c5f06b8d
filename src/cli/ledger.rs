use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub action: LedgerAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum LedgerAction {
    /// List recorded sites
    List,
    /// Forget one site
    Remove { url: String },
    /// Forget every site
    Clear,
}

pub async fn cmd_ledger(args: LedgerArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let app = ctx.app_context().await?;
    let ledger = app.ledger();
    match args.action {
        LedgerAction::List => {
            let sites = ledger.list().await.context("failed to read the ledger")?;
            if emit_structured(&output, &sites)? {
                return Ok(());
            }
            if sites.is_empty() {
                println!("No unregistered sites recorded");
            }
            for site in sites {
                println!("{site}");
            }
        }
        LedgerAction::Remove { url } => {
            let removed = ledger.remove(&url).await.context("failed to update the ledger")?;
            if removed {
                println!("Removed {url}");
            } else {
                println!("{url} was not recorded");
            }
        }
        LedgerAction::Clear => {
            ledger.clear().await.context("failed to clear the ledger")?;
            println!("Ledger cleared");
        }
    }
    Ok(())
}
