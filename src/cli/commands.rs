use clap::Subcommand;

use super::ledger::LedgerArgs;
use super::palettes::CssArgs;
use super::settings::SettingsArgs;
use super::simulate::SimulateArgs;
use super::trending::TrendingArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Run random-browsing sequences against the simulated browser
    Simulate(SimulateArgs),

    /// List the built-in palettes
    Palettes,

    /// Print the stylesheet generated for a palette
    Css(CssArgs),

    /// Inspect or edit the unregistered-site ledger
    Ledger(LedgerArgs),

    /// Inspect or edit persisted widget settings
    Settings(SettingsArgs),

    /// Fetch trending candidate URLs
    Trending(TrendingArgs),

    /// Show version and build information
    Info,
}
