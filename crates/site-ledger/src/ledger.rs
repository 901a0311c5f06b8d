use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::store::{KeyValueStore, StoreMap};
use crate::LedgerError;

pub const UNREGISTERED_SITES_KEY: &str = "unregisteredSites";

/// Persisted, deduplicated set of URLs whose page context never answered.
///
/// Read-modify-write cycles are serialised so concurrent marks cannot drop
/// each other's entries.
pub struct UnregisteredSiteLedger {
    store: Arc<dyn KeyValueStore>,
    write: Mutex<()>,
}

impl UnregisteredSiteLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// Appends `url` unless already present. Returns whether it was added.
    pub async fn mark_unregistered(&self, url: &str) -> Result<bool, LedgerError> {
        if url.is_empty() {
            return Ok(false);
        }
        let _guard = self.write.lock().await;
        let mut sites = self.read().await?;
        if sites.iter().any(|site| site == url) {
            return Ok(false);
        }
        sites.push(url.to_string());
        self.write_sites(sites).await?;
        info!(url = %url, "site recorded as unregistered");
        Ok(true)
    }

    pub async fn list(&self) -> Result<Vec<String>, LedgerError> {
        self.read().await
    }

    pub async fn remove(&self, url: &str) -> Result<bool, LedgerError> {
        let _guard = self.write.lock().await;
        let mut sites = self.read().await?;
        let before = sites.len();
        sites.retain(|site| site != url);
        if sites.len() == before {
            return Ok(false);
        }
        self.write_sites(sites).await?;
        Ok(true)
    }

    pub async fn clear(&self) -> Result<(), LedgerError> {
        let _guard = self.write.lock().await;
        self.write_sites(Vec::new()).await
    }

    async fn read(&self) -> Result<Vec<String>, LedgerError> {
        let map = self.store.get(&[UNREGISTERED_SITES_KEY]).await?;
        let Some(value) = map.get(UNREGISTERED_SITES_KEY) else {
            return Ok(Vec::new());
        };
        match value {
            Value::Array(items) => Ok(items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()),
            other => {
                warn!(kind = ?other, "ledger value is not a list; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write_sites(&self, sites: Vec<String>) -> Result<(), LedgerError> {
        let mut items = StoreMap::new();
        items.insert(
            UNREGISTERED_SITES_KEY.to_string(),
            Value::Array(sites.into_iter().map(Value::String).collect()),
        );
        self.store.set(items).await
    }
}
