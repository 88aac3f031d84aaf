//! Progress persistence
//!
//! A plain string key/value store, with `Data` on top giving typed access to
//! the few values the game keeps between sessions:
//! - deaths in the current run
//! - deaths of the last finished run ("best")
//! - last level reached
//!
//! Storage is best-effort. Missing or unreadable values read as defaults and
//! failed writes are logged, never returned.

use std::collections::HashMap;
use std::str::FromStr;

pub const APPLICATION_PREFIX: &str = "fearwater";
pub const LAST_LEVEL_KEY: &str = "fearwater_game_last_level";
pub const CURRENT_DEATHS_KEY: &str = "fearwater_game_current_deaths";
pub const BEST_DEATHS_KEY: &str = "fearwater_game_best_deaths";

/// String key/value backend
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

/// In-process storage (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// JSON file on disk, rewritten on every change
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: std::path::PathBuf,
    items: std::collections::BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    /// Open (or start) the store at `path`
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable save file {}: {}", path.display(), e);
                Default::default()
            }),
            Err(_) => Default::default(),
        };
        Self { path, items }
    }

    fn flush(&self) {
        match serde_json::to_string_pretty(&self.items) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    log::warn!("Failed to write {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to encode save data: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove_item(&mut self, key: &str) {
        if self.items.remove(key).is_some() {
            self.flush();
        }
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("LocalStorage rejected {}", key);
            }
        }
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Typed game progress on top of a key/value store
#[derive(Debug, Clone, Default)]
pub struct Data<S> {
    storage: S,
}

impl<S: KeyValueStore> Data<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save_deaths(&mut self, deaths: u32) {
        log::debug!("Saving deaths: {}", deaths);
        self.storage.set_item(CURRENT_DEATHS_KEY, &deaths.to_string());
    }

    pub fn load_deaths(&self) -> u32 {
        self.load_number(CURRENT_DEATHS_KEY).unwrap_or(0)
    }

    pub fn save_best_deaths(&mut self, deaths: u32) {
        self.storage.set_item(BEST_DEATHS_KEY, &deaths.to_string());
    }

    /// Best finished run, if any
    pub fn load_best_deaths(&self) -> Option<u32> {
        self.load_number(BEST_DEATHS_KEY)
    }

    pub fn save_last_level(&mut self, level: usize) {
        self.storage.set_item(LAST_LEVEL_KEY, &level.to_string());
    }

    pub fn last_level(&self) -> usize {
        self.load_number(LAST_LEVEL_KEY).unwrap_or(0)
    }

    fn load_number<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get_item(key)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring unparsable value for {}: {:?}", key, raw);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let data = Data::new(MemoryStorage::new());
        assert_eq!(data.load_deaths(), 0);
        assert_eq!(data.last_level(), 0);
        assert_eq!(data.load_best_deaths(), None);
    }

    #[test]
    fn test_values_round_trip_through_strings() {
        let mut data = Data::new(MemoryStorage::new());
        data.save_deaths(4);
        data.save_best_deaths(2);
        data.save_last_level(3);
        assert_eq!(data.storage().get_item(CURRENT_DEATHS_KEY).as_deref(), Some("4"));
        assert_eq!(data.load_deaths(), 4);
        assert_eq!(data.load_best_deaths(), Some(2));
        assert_eq!(data.last_level(), 3);
    }

    #[test]
    fn test_garbage_reads_as_default() {
        let mut storage = MemoryStorage::new();
        storage.set_item(CURRENT_DEATHS_KEY, "lots");
        let data = Data::new(storage);
        assert_eq!(data.load_deaths(), 0);
    }

    #[test]
    fn test_keys_share_prefix() {
        for key in [LAST_LEVEL_KEY, CURRENT_DEATHS_KEY, BEST_DEATHS_KEY] {
            assert!(key.starts_with(APPLICATION_PREFIX));
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_storage_persists() {
        let path = std::env::temp_dir().join(format!("fearwater_test_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut data = Data::new(FileStorage::open(&path));
            data.save_deaths(9);
        }
        let data = Data::new(FileStorage::open(&path));
        assert_eq!(data.load_deaths(), 9);
        let _ = std::fs::remove_file(&path);
    }
}
