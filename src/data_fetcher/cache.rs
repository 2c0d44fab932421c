//! Time-boxed resource cache with an injectable store
//!
//! One record per resource name, each holding the raw JSON payload and
//! the fetch timestamp. A record younger than the TTL is served without
//! a network call; older records are kept and only fall back into use
//! when every source fails. Corrupt or unreadable records are ignored
//! and recreated on the next successful fetch.

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::constants::cache_ttl;
use crate::error::AppError;

/// A cached resource payload with its fetch timestamp (epoch millis).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    pub fetched_at: i64,
    pub data: String,
}

impl CacheRecord {
    /// Creates a record stamped with the given reference time.
    pub fn new(data: String, now: DateTime<Utc>) -> Self {
        Self {
            fetched_at: now.timestamp_millis(),
            data,
        }
    }

    /// A record is fresh iff it is strictly younger than the resource TTL.
    /// Staleness never invalidates the data, it only stops short-circuiting
    /// the network.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.timestamp_millis() - self.fetched_at;
        age_ms < TimeDelta::hours(cache_ttl::RESOURCE_TTL_HOURS).num_milliseconds()
    }
}

/// Store abstraction over the per-resource cache records, so tests can
/// use an in-memory store and production a persistent one. Writes are
/// best-effort: a failed `put` must never block the read path.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheRecord>;
    fn put(&self, key: &str, record: CacheRecord) -> Result<(), AppError>;
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// Bounded in-memory store. The bound is far above the three resource
/// keys in use; LRU eviction just keeps misuse from growing unbounded.
pub struct MemoryCacheStore {
    entries: Mutex<LruCache<String, CacheRecord>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(LruCache::new(NonZeroUsize::new(16).unwrap())),
        }
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheRecord> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, record: CacheRecord) -> Result<(), AppError> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.put(key.to_string(), record);
        Ok(())
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.pop(key);
    }

    fn clear(&self) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.clear();
    }
}

/// Persistent store: one JSON record file per resource key under the
/// platform cache directory. Writes go through a temp file and rename so
/// a crash mid-write cannot leave a half-record behind.
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform cache directory.
    pub fn at_default_location() -> Self {
        Self::new(crate::config::paths::get_cache_dir_path())
    }

    fn record_path(&self, key: &str) -> PathBuf {
        // Resource keys are file names like "seasons.json"; anything
        // path-hostile is flattened before hitting the filesystem.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.cache"))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<CacheRecord> {
        let path = self.record_path(key);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CacheRecord>(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Ignoring corrupt cache record at {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    fn put(&self, key: &str, record: CacheRecord) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.record_path(key);
        let tmp = path.with_extension("cache.tmp");
        let json = serde_json::to_string(&record)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        debug!("Cached {} at {}", key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) {
        let path = self.record_path(key);
        if let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!("Failed to remove cache record {}: {}", path.display(), e);
        }
    }

    fn clear(&self) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "cache") {
                if let Err(e) = std::fs::remove_file(&path) {
                    warn!("Failed to remove cache record {}: {}", path.display(), e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::Path;

    fn at(ts_millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ts_millis).unwrap()
    }

    #[test]
    fn test_record_freshness_window() {
        let fetched = at(1_000_000);
        let record = CacheRecord::new("{}".to_string(), fetched);

        assert!(record.is_fresh(fetched));

        let just_under = fetched + TimeDelta::hours(24) - TimeDelta::milliseconds(1);
        assert!(record.is_fresh(just_under));

        // Exactly 24h old is no longer fresh
        let boundary = fetched + TimeDelta::hours(24);
        assert!(!record.is_fresh(boundary));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCacheStore::new();
        let now = at(5_000);

        assert!(store.get("seasons.json").is_none());

        store
            .put("seasons.json", CacheRecord::new("[1]".to_string(), now))
            .unwrap();
        let record = store.get("seasons.json").unwrap();
        assert_eq!(record.data, "[1]");
        assert_eq!(record.fetched_at, 5_000);

        store.remove("seasons.json");
        assert!(store.get("seasons.json").is_none());
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryCacheStore::new();
        let now = at(5_000);
        store
            .put("a", CacheRecord::new("1".to_string(), now))
            .unwrap();
        store
            .put("b", CacheRecord::new("2".to_string(), now))
            .unwrap();

        store.clear();
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        let now = at(42_000);

        store
            .put(
                "episodes.json",
                CacheRecord::new(r#"{"episodes_by_season":{}}"#.to_string(), now),
            )
            .unwrap();

        let record = store.get("episodes.json").unwrap();
        assert_eq!(record.fetched_at, 42_000);
        assert_eq!(record.data, r#"{"episodes_by_season":{}}"#);

        store.remove("episodes.json");
        assert!(store.get("episodes.json").is_none());
    }

    #[test]
    fn test_file_store_ignores_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());

        std::fs::write(dir.path().join("seasons.json.cache"), "not json at all").unwrap();
        assert!(store.get("seasons.json").is_none());

        // A later put recreates the record
        store
            .put("seasons.json", CacheRecord::new("[]".to_string(), at(1)))
            .unwrap();
        assert!(store.get("seasons.json").is_some());
    }

    #[test]
    fn test_file_store_clear_only_touches_cache_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(dir.path());
        store
            .put("seasons.json", CacheRecord::new("[]".to_string(), at(1)))
            .unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "keep me").unwrap();

        store.clear();
        assert!(store.get("seasons.json").is_none());
        assert!(dir.path().join("unrelated.txt").exists());
    }

    #[test]
    fn test_record_path_flattens_hostile_keys() {
        let store = FileCacheStore::new("/tmp/cache");
        let path = store.record_path("../../etc/passwd");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.contains('/'));
        assert!(name.ends_with(".cache"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/cache")));
    }
}
