//! TTL-bound session caching over a storage façade.
//!
//! Each [`SessionCache`] is bound to one key and one TTL at construction
//! and stores a `{data, timestamp}` JSON envelope. Storage failures of
//! any kind degrade to cache misses: caching here is advisory, never
//! load-bearing. A [`CacheRegistry`] owns the storage, hands out caches,
//! and supports one bulk clear-and-broadcast "sync" so independent
//! fetchers can react to a manual refresh without coupling.

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default TTL for fetched record sets.
pub const SESSION_TTL: Duration = Duration::from_secs(600);

/// Raw string storage. Implementations must swallow their own errors;
/// a failed read is a miss and a failed write is a no-op.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage backed by `DashMap`.
#[derive(Default)]
pub struct MemoryStorage {
    map: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.remove(key);
    }
}

/// File-backed storage: one JSON object of key → value in a single
/// file. IO and parse failures are logged at debug and swallowed.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return serde_json::Map::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("cache file unreadable, starting empty: {}", e);
            serde_json::Map::new()
        })
    }

    fn write_map(&self, map: &serde_json::Map<String, serde_json::Value>) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string(map) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::debug!("cache write failed, continuing uncached: {}", e);
                }
            }
            Err(e) => tracing::debug!("cache serialization failed: {}", e),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map()
            .get(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.read_map();
        map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self.write_map(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map);
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    /// Milliseconds since the epoch at write time.
    timestamp: i64,
}

/// A typed cache slot bound to one key and one TTL.
pub struct SessionCache<T> {
    key: String,
    ttl: Duration,
    storage: Arc<dyn Storage>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SessionCache<T>
where
    T: Serialize + DeserializeOwned,
{
    fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Returns the cached value, or `None` when missing, expired, or
    /// unreadable. Expired entries stay in storage so [`Self::get_stale`]
    /// can still serve them as a last-known-good fallback.
    pub fn get(&self) -> Option<T> {
        let raw = self.storage.get(&self.key)?;
        let envelope: Envelope<T> = serde_json::from_str(&raw).ok()?;
        if Self::now_ms() - envelope.timestamp > self.ttl.as_millis() as i64 {
            return None;
        }
        Some(envelope.data)
    }

    /// Returns the cached value ignoring the TTL. Used as the
    /// last-known-good fallback when a fetch fails.
    pub fn get_stale(&self) -> Option<T> {
        let raw = self.storage.get(&self.key)?;
        let envelope: Envelope<T> = serde_json::from_str(&raw).ok()?;
        Some(envelope.data)
    }

    /// The stored envelope verbatim, for restore-on-rollback. Unlike
    /// [`Self::set`] a later [`Self::restore`] keeps the original write
    /// timestamp, so reverting an optimistic update cannot revive an
    /// expired entry as fresh.
    pub fn snapshot(&self) -> Option<String> {
        self.storage.get(&self.key)
    }

    /// Puts a [`Self::snapshot`] back, or clears the key when there was
    /// nothing stored at snapshot time.
    pub fn restore(&self, snapshot: Option<String>) {
        match snapshot {
            Some(raw) => self.storage.set(&self.key, &raw),
            None => self.storage.remove(&self.key),
        }
    }

    /// Stores a value with a fresh timestamp.
    pub fn set(&self, data: &T) {
        let envelope = Envelope {
            data,
            timestamp: Self::now_ms(),
        };
        if let Ok(json) = serde_json::to_string(&envelope) {
            self.storage.set(&self.key, &json);
        }
    }
}

/// Broadcast payload of a bulk cache sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncEvent;

/// Owns the storage and the set of registered cache keys.
pub struct CacheRegistry {
    storage: Arc<dyn Storage>,
    keys: Mutex<Vec<String>>,
    tx: broadcast::Sender<SyncEvent>,
}

impl CacheRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (tx, _) = broadcast::channel(16);
        Self {
            storage,
            keys: Mutex::new(Vec::new()),
            tx,
        }
    }

    /// Creates and registers a typed cache slot.
    pub fn cache<T>(&self, key: &str, ttl: Duration) -> SessionCache<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
        SessionCache {
            key: key.to_string(),
            ttl,
            storage: Arc::clone(&self.storage),
            _marker: PhantomData,
        }
    }

    /// Clears every registered key and broadcasts a sync event.
    pub fn sync_all(&self) {
        let keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        for key in keys.iter() {
            self.storage.remove(key);
        }
        // No receivers is fine; the event is advisory.
        let _ = self.tx.send(SyncEvent);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.tx.subscribe()
    }
}
