// src/services/cache.rs
use chrono::Utc;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    timestamp: i64,
    data: T,
}

/// JSON files on disk with a per-read TTL. Anything unreadable is a miss.
#[derive(Debug, Clone)]
pub struct FileCache {
    base_path: PathBuf,
}

impl FileCache {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        FileCache {
            base_path: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', ':'], "_");
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl_seconds: i64) -> Option<T> {
        self.get_at(key, ttl_seconds, Utc::now().timestamp())
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, ttl_seconds: i64, now: i64) -> Option<T> {
        let path = self.path_for(key);
        let raw = fs::read_to_string(&path).ok()?;
        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };
        if now.saturating_sub(envelope.timestamp) > ttl_seconds {
            debug!("Cache entry {} expired", key);
            return None;
        }
        Some(envelope.data)
    }

    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> anyhow::Result<()> {
        self.set_at(key, data, Utc::now().timestamp())
    }

    fn set_at<T: Serialize>(&self, key: &str, data: &T, timestamp: i64) -> anyhow::Result<()> {
        fs::create_dir_all(&self.base_path)?;
        let envelope = Envelope { timestamp, data };
        fs::write(self.path_for(key), serde_json::to_string_pretty(&envelope)?)?;
        Ok(())
    }
}
