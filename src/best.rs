//! Best score persistence
//!
//! The store is a plain key/value boundary. Missing keys, unavailable storage
//! and garbage values all read as 0.

use std::collections::HashMap;

/// Storage key for the best score
pub const BEST_KEY: &str = "xgp_archery_best_v5";

/// Key/value store holding best scores
pub trait BestScoreStore {
    /// Stored best for `key`, or 0 if absent or unparseable
    fn get(&self, key: &str) -> u64;
    fn set(&mut self, key: &str, value: u64);
    fn clear(&mut self, key: &str);
}

/// Parse a raw stored value; anything odd reads as 0
pub fn parse_best(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else { return 0 };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
        Ok(_) => 0,
        Err(_) => {
            log::warn!("Ignoring unparseable best score {:?}", raw);
            0
        }
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw string, as another tab or a user might
    pub fn set_raw(&mut self, key: &str, raw: &str) {
        self.values.insert(key.to_string(), raw.to_string());
    }
}

impl BestScoreStore for MemoryStore {
    fn get(&self, key: &str) -> u64 {
        parse_best(self.values.get(key).map(String::as_str))
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn clear(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> u64 {
        let raw = Self::storage().and_then(|s| s.get_item(key).ok().flatten());
        parse_best(raw.as_deref())
    }

    fn set(&mut self, key: &str, value: u64) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, &value.to_string()).is_err() {
                log::warn!("Failed to save best score");
            }
        }
    }

    fn clear(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Best score tracker bound to one store key
#[derive(Debug, Clone)]
pub struct BestScore {
    key: String,
    best: u64,
}

impl BestScore {
    /// Load the best score for `key`
    pub fn load(store: &dyn BestScoreStore, key: &str) -> Self {
        let best = store.get(key);
        log::info!("Best score: {}", best);
        Self {
            key: key.to_string(),
            best,
        }
    }

    pub fn value(&self) -> u64 {
        self.best
    }

    /// Record a score; persists and returns true if it beats the best
    pub fn submit(&mut self, store: &mut dyn BestScoreStore, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        store.set(&self.key, score);
        true
    }

    /// Forget the best score (the "reset best" button)
    pub fn clear(&mut self, store: &mut dyn BestScoreStore) {
        store.clear(&self.key);
        self.best = 0;
        log::info!("Best score cleared");
    }
}
