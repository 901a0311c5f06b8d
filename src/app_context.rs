//! Shared application components built once per process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use palette_styler::{catalog, Theme};
use site_ledger::{JsonFileStore, KeyValueStore, UnregisteredSiteLedger, WidgetSettings};
use tracing::debug;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

pub struct AppContext {
    config: Arc<Config>,
    store_path: Option<PathBuf>,
    store: Arc<dyn KeyValueStore>,
    ledger: Arc<UnregisteredSiteLedger>,
    settings: WidgetSettings,
}

impl AppContext {
    /// Opens the JSON store named by the config and installs default settings.
    pub async fn open(config: Config) -> AppResult<Self> {
        let path = config.resolved_store_path()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(path.clone()));
        let ctx = Self::with_store(config, store, Some(path));
        if ctx.settings.ensure_defaults().await? {
            debug!("default widget state installed");
        }
        Ok(ctx)
    }

    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        store_path: Option<PathBuf>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store_path,
            ledger: Arc::new(UnregisteredSiteLedger::new(Arc::clone(&store))),
            settings: WidgetSettings::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub fn ledger(&self) -> Arc<UnregisteredSiteLedger> {
        Arc::clone(&self.ledger)
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Custom websites when saved, else the configured defaults.
    pub async fn websites(&self) -> AppResult<Vec<String>> {
        match self.settings.custom_websites().await? {
            Some(custom) if !custom.is_empty() => Ok(custom),
            _ => Ok(self.config.default_websites.clone()),
        }
    }

    /// Theme for opened pages: an explicit palette key wins, otherwise the
    /// saved widget palette when "apply to page" is on.
    pub async fn page_theme(&self, palette: Option<&str>) -> AppResult<Option<Theme>> {
        if let Some(key) = palette {
            let entry =
                catalog::lookup(key).ok_or_else(|| AppError::UnknownPalette(key.to_string()))?;
            return Ok(Some(entry.to_theme()));
        }
        let state = self.settings.widget_state().await?;
        if !state.apply_to_page {
            return Ok(None);
        }
        Ok(Some(catalog::by_index(state.index as usize).to_theme()))
    }
}
