//! Scoreboard payload caching.
//!
//! Payloads are cached twice over: a short "fresh" window sized from the
//! update interval keeps repeated cycles off the network, and a long stale
//! window lets the ticker keep displaying yesterday's successful fetch when
//! the upstream goes away mid-day.

use log::*;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub trait Cache {
    /// Returns the cached value for `key` if it exists and is younger than
    /// `max_age`.
    fn get(&self, key: &str, max_age: Duration) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One file per key under a cache directory, aged by file mtime.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Failed to create cache dir {}: {e}", dir.display());
        }
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str, max_age: Duration) -> Option<String> {
        let path = self.path_for(key);
        let meta = fs::metadata(&path).ok()?;
        let age = meta.modified().ok()?.elapsed().ok()?;
        if age > max_age {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    fn set(&self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = fs::write(&path, value) {
            warn!("Failed to write cache entry {}: {e}", path.display());
        }
    }
}

/// Builds the cache key for one scoreboard request. The query parameters are
/// hashed in sorted order so the same request always lands on the same key,
/// while the date stays readable for manual cleanup.
pub fn scoreboard_cache_key(
    plugin_id: &str,
    league_key: &str,
    date_token: &str,
    params: &BTreeMap<&'static str, String>,
) -> String {
    let canonical = serde_json::to_string(params).unwrap_or_default();
    let digest = Sha256::digest(canonical.as_bytes());
    let short = hex::encode(&digest[..8]);
    format!("{plugin_id}_{league_key}_{date_token}_{}", &short[..10])
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::sync::Mutex;
    use std::time::Instant;

    /// In-memory cache for plugin tests.
    #[derive(Default)]
    pub struct MemoryCache {
        entries: Mutex<BTreeMap<String, (Instant, String)>>,
    }

    impl Cache for MemoryCache {
        fn get(&self, key: &str, max_age: Duration) -> Option<String> {
            let entries = self.entries.lock().unwrap();
            let (written, value) = entries.get(key)?;
            if written.elapsed() > max_age {
                return None;
            }
            Some(value.clone())
        }

        fn set(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (Instant::now(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_key_is_stable_across_param_order() {
        let mut a = BTreeMap::new();
        a.insert("dates", "20260827".to_string());
        a.insert("limit", "500".to_string());
        let mut b = BTreeMap::new();
        b.insert("limit", "500".to_string());
        b.insert("dates", "20260827".to_string());
        assert_eq!(
            scoreboard_cache_key("ticker", "nfl", "20260827", &a),
            scoreboard_cache_key("ticker", "nfl", "20260827", &b),
        );
    }

    #[test]
    fn test_key_varies_with_params() {
        let mut a = BTreeMap::new();
        a.insert("groups", "50".to_string());
        let b = BTreeMap::new();
        let key_a = scoreboard_cache_key("ticker", "ncaam", "20260827", &a);
        let key_b = scoreboard_cache_key("ticker", "ncaam", "20260827", &b);
        assert_ne!(key_a, key_b);
        assert!(key_a.starts_with("ticker_ncaam_20260827_"));
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = std::env::temp_dir().join(format!("ticker-cache-test-{}", std::process::id()));
        let cache = FileCache::new(dir.clone());
        cache.set("k", "payload");
        assert_eq!(
            cache.get("k", Duration::from_secs(60)),
            Some("payload".to_string())
        );
        assert_eq!(cache.get("k", Duration::ZERO), None);
        assert_eq!(cache.get("missing", Duration::from_secs(60)), None);
        let _ = std::fs::remove_dir_all(dir);
    }
}
