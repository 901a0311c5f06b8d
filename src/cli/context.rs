use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::OnceCell;

use palette_wander::{AppContext, Config};

pub struct CliContext {
    config: Arc<Config>,
    config_path: PathBuf,
    app_context: OnceCell<Arc<AppContext>>,
}

impl CliContext {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            app_context: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Opens the persisted store on first use.
    pub async fn app_context(&self) -> Result<Arc<AppContext>> {
        self.app_context
            .get_or_try_init(|| async {
                AppContext::open(self.config.as_ref().clone())
                    .await
                    .map(Arc::new)
                    .context("failed to open the settings store")
            })
            .await
            .map(Arc::clone)
    }
}
