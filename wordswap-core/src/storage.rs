//! Rule persistence as seen by the engine.
//!
//! The store is a JSON key-value map. The engine reads two keys from it,
//! [`RULE_SET_KEY`] and [`ENABLED_KEY`], once through
//! [`RuleStore::load_snapshot`] and afterwards through the change stream from
//! [`RuleStore::subscribe`]. Only editors write to it.
//!
//! License: MIT OR Apache-2.0

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::{broadcast, RwLock};

use crate::config::MAX_STORE_BYTES;
use crate::errors::{Result, WordswapError};
use crate::rules::RuleSet;

pub const RULE_SET_KEY: &str = "ruleSet";
pub const ENABLED_KEY: &str = "extensionEnabled";

const CHANGE_CHANNEL_CAPACITY: usize = 64;
const STORE_FILE_TMP_SUFFIX: &str = ".tmp";

/// The two values the engine needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub rule_set: RuleSet,
    pub enabled: bool,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            rule_set: RuleSet::new(),
            enabled: true,
        }
    }
}

impl StoreSnapshot {
    pub fn from_values(values: &Map<String, Value>) -> Self {
        Self {
            rule_set: rule_set_from_value(values.get(RULE_SET_KEY)),
            enabled: enabled_from_value(values.get(ENABLED_KEY)),
        }
    }
}

/// One changed key, with its value before and after. `None` means absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

/// Reads a stored rule set leniently: absent or malformed values become an
/// empty set, because the engine must never fail on bad storage.
pub fn rule_set_from_value(value: Option<&Value>) -> RuleSet {
    let Some(value) = value else {
        return RuleSet::new();
    };
    if value.is_null() {
        return RuleSet::new();
    }
    match serde_json::from_value::<RuleSet>(value.clone()) {
        Ok(set) => set,
        Err(e) => {
            warn!("Stored rule set is unreadable; treating it as empty: {}", e);
            RuleSet::new()
        }
    }
}

/// The master switch defaults to on when absent or not a boolean.
pub fn enabled_from_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!("Stored master switch is not a boolean ({}); assuming on.", other);
            true
        }
    }
}

/// Asynchronous access to the rule store.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Reads the current rule set and master switch.
    async fn load_snapshot(&self) -> Result<StoreSnapshot>;

    /// A stream of every subsequent change to the store.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// An in-memory store with a byte quota.
#[derive(Debug)]
pub struct MemoryStore {
    values: RwLock<Map<String, Value>>,
    changes: broadcast::Sender<StorageChange>,
    quota_bytes: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_values(Map::new())
    }

    pub fn with_values(values: Map<String, Value>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            values: RwLock::new(values),
            changes,
            quota_bytes: MAX_STORE_BYTES,
        }
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// A store holding `rule_set` with the master switch on.
    pub fn from_rule_set(rule_set: &RuleSet) -> Result<Self> {
        let mut values = Map::new();
        values.insert(RULE_SET_KEY.to_string(), rule_set_to_value(rule_set)?);
        values.insert(ENABLED_KEY.to_string(), Value::Bool(true));
        Ok(Self::with_values(values))
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.values.read().await.get(key).cloned()
    }

    /// Writes `value` under `key` and notifies subscribers.
    pub async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().await;
        let mut candidate = values.clone();
        candidate.insert(key.to_string(), value.clone());
        let size = serde_json::to_vec(&candidate)
            .map_err(|e| WordswapError::SerializationError(key.to_string(), e))?
            .len();
        if size > self.quota_bytes {
            return Err(WordswapError::QuotaExceeded(size, self.quota_bytes));
        }
        let old_value = values.insert(key.to_string(), value.clone());
        drop(values);
        debug!("Store key '{}' updated ({} bytes total).", key, size);
        self.notify(StorageChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        });
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        let old_value = self.values.write().await.remove(key);
        if old_value.is_some() {
            self.notify(StorageChange {
                key: key.to_string(),
                old_value: old_value.clone(),
                new_value: None,
            });
        }
        old_value
    }

    fn notify(&self, change: StorageChange) {
        // No subscribers is not an error: nobody is listening yet.
        if self.changes.send(change).is_err() {
            debug!("Store change had no subscribers.");
        }
    }

    /// The stored rule set, failing on malformed data so editors do not
    /// silently overwrite it.
    pub async fn rule_set(&self) -> Result<RuleSet> {
        match self.get(RULE_SET_KEY).await {
            None | Some(Value::Null) => Ok(RuleSet::new()),
            Some(value) => {
                let set: RuleSet = serde_json::from_value(value)
                    .map_err(|e| WordswapError::SerializationError(RULE_SET_KEY.to_string(), e))?;
                Ok(set)
            }
        }
    }

    pub async fn save_rule_set(&self, rule_set: &RuleSet) -> Result<()> {
        rule_set.validate()?;
        self.set(RULE_SET_KEY, rule_set_to_value(rule_set)?).await
    }

    pub async fn enabled(&self) -> bool {
        enabled_from_value(self.get(ENABLED_KEY).await.as_ref())
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.set(ENABLED_KEY, Value::Bool(enabled)).await
    }

    pub async fn to_json(&self) -> Result<String> {
        let values = self.values.read().await;
        serde_json::to_string_pretty(&*values)
            .map_err(|e| WordswapError::SerializationError("store".to_string(), e))
    }
}

fn rule_set_to_value(rule_set: &RuleSet) -> Result<Value> {
    serde_json::to_value(rule_set)
        .map_err(|e| WordswapError::SerializationError(RULE_SET_KEY.to_string(), e))
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn load_snapshot(&self) -> Result<StoreSnapshot> {
        let values = self.values.read().await;
        Ok(StoreSnapshot::from_values(&values))
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

/// A [`MemoryStore`] loaded from and persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => serde_json::from_str::<Map<String, Value>>(&text)
                .map_err(|e| WordswapError::SerializationError(path.display().to_string(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}; starting empty.", path.display());
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };
        info!("Opened store {} ({} key(s)).", path.display(), values.len());
        Ok(Self {
            path,
            inner: MemoryStore::with_values(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &MemoryStore {
        &self.inner
    }

    /// Writes the store atomically: temp file first, then rename.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = self.inner.to_json().await?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(STORE_FILE_TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Persisted store to {}.", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl RuleStore for FileStore {
    async fn load_snapshot(&self) -> Result<StoreSnapshot> {
        self.inner.load_snapshot().await
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_readers_fall_back() {
        assert!(rule_set_from_value(None).is_empty());
        assert!(rule_set_from_value(Some(&json!("garbage"))).is_empty());
        assert!(enabled_from_value(None));
        assert!(!enabled_from_value(Some(&json!(false))));
        assert!(enabled_from_value(Some(&json!("no"))));
    }

    #[tokio::test]
    async fn set_emits_change_with_old_and_new_values() {
        let store = MemoryStore::new();
        let mut changes = store.subscribe();
        store.set_enabled(false).await.unwrap();
        store.set_enabled(true).await.unwrap();

        let first = changes.recv().await.unwrap();
        assert_eq!(first.key, ENABLED_KEY);
        assert_eq!(first.old_value, None);
        assert_eq!(first.new_value, Some(json!(false)));
        let second = changes.recv().await.unwrap();
        assert_eq!(second.old_value, Some(json!(false)));
    }

    #[tokio::test]
    async fn quota_rejects_oversized_writes() {
        let store = MemoryStore::new().with_quota(64);
        let err = store.set("big", json!("x".repeat(100))).await.unwrap_err();
        assert!(matches!(err, WordswapError::QuotaExceeded(_, 64)));
        assert!(store.get("big").await.is_none());
    }

    #[tokio::test]
    async fn snapshot_reads_both_keys() {
        let store = MemoryStore::with_values(
            json!({"ruleSet": {"cat": {"replacement": "dog"}}, "extensionEnabled": false})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let snapshot = store.load_snapshot().await.unwrap();
        assert!(!snapshot.enabled);
        assert_eq!(snapshot.rule_set.get("cat").unwrap().replacement, "dog");
    }
}
