use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use crate::LedgerError;

pub type StoreMap = Map<String, Value>;

/// Extension-style storage: keyed JSON values, read by key list and
/// written by merging a partial map.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns only the requested keys that are present.
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, LedgerError>;

    async fn set(&self, items: StoreMap) -> Result<(), LedgerError>;
}

fn pick(all: &StoreMap, keys: &[&str]) -> StoreMap {
    keys.iter()
        .filter_map(|key| all.get(*key).map(|value| ((*key).to_string(), value.clone())))
        .collect()
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<StoreMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StoreMap {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, LedgerError> {
        Ok(pick(&self.inner.lock(), keys))
    }

    async fn set(&self, items: StoreMap) -> Result<(), LedgerError> {
        self.inner.lock().extend(items);
        Ok(())
    }
}

/// One pretty-printed JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
    write: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<StoreMap, LedgerError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(StoreMap::new()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StoreMap::new());
        }
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(map),
            _ => Err(LedgerError::NotAnObject),
        }
    }

    async fn persist(&self, map: &StoreMap) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(map)?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".into());
        let temp = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));
        fs::write(&temp, json).await?;
        if let Err(err) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(err.into());
        }
        debug!(path = %self.path.display(), keys = map.len(), "store persisted");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[&str]) -> Result<StoreMap, LedgerError> {
        let all = self.load().await?;
        Ok(pick(&all, keys))
    }

    async fn set(&self, items: StoreMap) -> Result<(), LedgerError> {
        let _guard = self.write.lock().await;
        let mut all = self.load().await?;
        all.extend(items);
        self.persist(&all).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_returns_only_present_keys() {
        let store = MemoryStore::new();
        let mut items = StoreMap::new();
        items.insert("a".into(), json!(1));
        store.set(items).await.unwrap();

        let got = store.get(&["a", "b"]).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got["a"], json!(1));
    }

    #[tokio::test]
    async fn file_store_merges_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let store = JsonFileStore::new(&path);

        let mut first = StoreMap::new();
        first.insert("a".into(), json!("x"));
        store.set(first).await.unwrap();
        let mut second = StoreMap::new();
        second.insert("b".into(), json!([1, 2]));
        store.set(second).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        let got = reopened.get(&["a", "b"]).await.unwrap();
        assert_eq!(got["a"], json!("x"));
        assert_eq!(got["b"], json!([1, 2]));

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn file_store_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1,2,3]").unwrap();

        let err = JsonFileStore::new(&path).get(&["a"]).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotAnObject));
    }
}
