//! Local snapshot of the last discovered base URL
//!
//! The cache is best-effort: a missing or corrupt file reads as empty and
//! a failed write is logged and forgotten.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Persisted discovery result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Last base stream URL, validated or fallback
    #[serde(default)]
    pub base_stream_url: Option<String>,

    /// When `base_stream_url` was written, in epoch seconds
    #[serde(default)]
    pub base_ts: f64,

    /// Candidate hosts considered in the run that wrote this record
    #[serde(default)]
    pub candidates: Vec<String>,
}

impl CacheRecord {
    /// Age of the record in seconds at `now`
    pub fn age(&self, now: f64) -> f64 {
        now - self.base_ts
    }

    /// Returns the cached URL if the record is younger than `ttl_seconds`
    ///
    /// A record stamped in the future is stale.
    pub fn fresh_url(&self, now: f64, ttl_seconds: u64) -> Option<&str> {
        let url = self.base_stream_url.as_deref()?;
        let age = self.age(now);
        if (0.0..ttl_seconds as f64).contains(&age) {
            Some(url)
        } else {
            None
        }
    }
}

/// Reads and writes the cache file at a fixed path
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    /// Create a store for the cache file at `path`; nothing is read yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, treating any failure as an empty cache
    pub async fn load(&self) -> CacheRecord {
        match self.try_load().await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(path = %self.path.display(), "no cache file");
                CacheRecord::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cache unreadable, ignoring");
                CacheRecord::default()
            }
        }
    }

    /// Save the record, logging any failure
    pub async fn save(&self, record: &CacheRecord) {
        if let Err(e) = self.try_save(record).await {
            warn!(path = %self.path.display(), error = %e, "failed to write cache");
        }
    }

    async fn try_load(&self) -> Result<Option<CacheRecord>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn try_save(&self, record: &CacheRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, ts: f64) -> CacheRecord {
        CacheRecord {
            base_stream_url: Some(url.to_string()),
            base_ts: ts,
            candidates: vec!["a.example".to_string()],
        }
    }

    #[test]
    fn test_fresh_url_within_ttl() {
        let rec = record("https://a.example/", 1000.0);
        assert_eq!(rec.fresh_url(1500.0, 600), Some("https://a.example/"));
    }

    #[test]
    fn test_fresh_url_expired() {
        let rec = record("https://a.example/", 1000.0);
        assert_eq!(rec.fresh_url(1600.0, 600), None);
        assert_eq!(rec.fresh_url(2000.0, 600), None);
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let rec = record("https://a.example/", 5000.0);
        assert_eq!(rec.fresh_url(1000.0, 600), None);
        assert_eq!(rec.fresh_url(4999.5, 600), None);
        assert_eq!(rec.fresh_url(5000.0, 600), Some("https://a.example/"));
    }

    #[test]
    fn test_fresh_url_absent() {
        let rec = CacheRecord::default();
        assert_eq!(rec.fresh_url(0.0, 600), None);
    }

    #[test]
    fn test_record_deserializes_partial_json() {
        let rec: CacheRecord = serde_json::from_str(r#"{"base_ts": 12.5}"#).unwrap();
        assert_eq!(rec.base_stream_url, None);
        assert_eq!(rec.base_ts, 12.5);
        assert!(rec.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache.json"));
        let rec = record("https://b.example/", 42.0);

        store.save(&rec).await;
        assert!(store.path().exists());
        assert_eq!(store.load().await, rec);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load().await, CacheRecord::default());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = CacheStore::new(path);
        assert_eq!(store.load().await, CacheRecord::default());
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nope").join("cache.json"));
        store.save(&record("https://c.example/", 1.0)).await;
        assert_eq!(store.load().await, CacheRecord::default());
    }
}
