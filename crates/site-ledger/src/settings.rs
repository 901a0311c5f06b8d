use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::store::{KeyValueStore, StoreMap};
use crate::LedgerError;

pub const WIDGET_STATE_KEY: &str = "colorWidgetState";
pub const CUSTOM_WEBSITES_KEY: &str = "customWebsites";

/// Selected palette and whether it should also style opened pages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetState {
    pub index: u32,
    pub apply_to_page: bool,
}

pub struct WidgetSettings {
    store: Arc<dyn KeyValueStore>,
}

impl WidgetSettings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Writes the default widget state when none is stored yet.
    /// Returns whether anything was written.
    pub async fn ensure_defaults(&self) -> Result<bool, LedgerError> {
        let present = self.store.get(&[WIDGET_STATE_KEY]).await?;
        if present.contains_key(WIDGET_STATE_KEY) {
            return Ok(false);
        }
        self.set_widget_state(WidgetState::default()).await?;
        debug!("installed default widget state");
        Ok(true)
    }

    pub async fn widget_state(&self) -> Result<WidgetState, LedgerError> {
        let map = self.store.get(&[WIDGET_STATE_KEY]).await?;
        let Some(value) = map.get(WIDGET_STATE_KEY) else {
            return Ok(WidgetState::default());
        };
        match serde_json::from_value(value.clone()) {
            Ok(state) => Ok(state),
            Err(err) => {
                warn!(error = %err, "stored widget state unreadable; using default");
                Ok(WidgetState::default())
            }
        }
    }

    pub async fn set_widget_state(&self, state: WidgetState) -> Result<(), LedgerError> {
        let mut items = StoreMap::new();
        items.insert(WIDGET_STATE_KEY.to_string(), serde_json::to_value(state)?);
        self.store.set(items).await
    }

    /// `None` when the user never saved a custom list.
    pub async fn custom_websites(&self) -> Result<Option<Vec<String>>, LedgerError> {
        let map = self.store.get(&[CUSTOM_WEBSITES_KEY]).await?;
        Ok(match map.get(CUSTOM_WEBSITES_KEY) {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        })
    }

    pub async fn set_custom_websites(&self, websites: &[String]) -> Result<(), LedgerError> {
        let mut items = StoreMap::new();
        items.insert(CUSTOM_WEBSITES_KEY.to_string(), serde_json::to_value(websites)?);
        self.store.set(items).await
    }

    pub async fn reset(&self) -> Result<(), LedgerError> {
        let mut items = StoreMap::new();
        items.insert(
            WIDGET_STATE_KEY.to_string(),
            serde_json::to_value(WidgetState::default())?,
        );
        items.insert(CUSTOM_WEBSITES_KEY.to_string(), Value::Null);
        self.store.set(items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn defaults_are_written_once() {
        let store = Arc::new(MemoryStore::new());
        let settings = WidgetSettings::new(store.clone());
        assert!(settings.ensure_defaults().await.unwrap());

        settings
            .set_widget_state(WidgetState {
                index: 4,
                apply_to_page: true,
            })
            .await
            .unwrap();
        assert!(!settings.ensure_defaults().await.unwrap());
        assert_eq!(
            store.snapshot()[WIDGET_STATE_KEY],
            json!({"index": 4, "applyToPage": true})
        );
    }

    #[tokio::test]
    async fn reset_clears_custom_list() {
        let settings = WidgetSettings::new(Arc::new(MemoryStore::new()));
        settings
            .set_custom_websites(&["https://example.com".to_string()])
            .await
            .unwrap();
        assert_eq!(
            settings.custom_websites().await.unwrap(),
            Some(vec!["https://example.com".to_string()])
        );

        settings.reset().await.unwrap();
        assert_eq!(settings.custom_websites().await.unwrap(), None);
        assert_eq!(settings.widget_state().await.unwrap(), WidgetState::default());
    }
}
