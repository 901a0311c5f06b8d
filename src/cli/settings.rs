use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use palette_styler::catalog;
use serde::Serialize;
use site_ledger::WidgetState;

use super::context::CliContext;
use super::output::{emit_structured, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum SettingsAction {
    /// Show the saved widget state and website list
    Show,
    /// Select the default palette by index
    SetPalette { index: u32 },
    /// Style opened pages with the selected palette
    ApplyToPage {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Save a custom website list (empty restores the built-in list)
    SetWebsites { urls: Vec<String> },
    /// Restore defaults
    Reset,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    color_widget_state: WidgetState,
    palette: &'static str,
    custom_websites: Option<Vec<String>>,
    store_path: Option<String>,
}

pub async fn cmd_settings(
    args: SettingsArgs,
    ctx: &CliContext,
    output: OutputFormat,
) -> Result<()> {
    let app = ctx.app_context().await?;
    let settings = app.settings();
    match args.action {
        SettingsAction::Show => {
            let state = settings.widget_state().await.context("failed to read settings")?;
            let view = SettingsView {
                color_widget_state: state,
                palette: catalog::by_index(state.index as usize).name,
                custom_websites: settings.custom_websites().await?,
                store_path: app.store_path().map(|path| path.display().to_string()),
            };
            if emit_structured(&output, &view)? {
                return Ok(());
            }
            println!("Palette:        {} ({})", view.palette, state.index);
            println!("Apply to page:  {}", state.apply_to_page);
            match view.custom_websites.as_ref() {
                Some(urls) => println!("Websites:       {} custom", urls.len()),
                None => println!("Websites:       built-in list"),
            }
            if let Some(path) = view.store_path.as_ref() {
                println!("Store:          {path}");
            }
        }
        SettingsAction::SetPalette { index } => {
            if index as usize >= catalog::PALETTES.len() {
                bail!(
                    "palette index {index} out of range (0..{})",
                    catalog::PALETTES.len()
                );
            }
            let mut state = settings.widget_state().await?;
            state.index = index;
            settings.set_widget_state(state).await?;
            println!("Default palette set to {}", catalog::by_index(index as usize).name);
        }
        SettingsAction::ApplyToPage { enabled } => {
            let mut state = settings.widget_state().await?;
            state.apply_to_page = enabled;
            settings.set_widget_state(state).await?;
            println!("Apply to page: {enabled}");
        }
        SettingsAction::SetWebsites { urls } => {
            settings.set_custom_websites(&urls).await?;
            println!("Saved {} websites", urls.len());
        }
        SettingsAction::Reset => {
            settings.reset().await.context("failed to reset settings")?;
            println!("Defaults restored");
        }
    }
    Ok(())
}
