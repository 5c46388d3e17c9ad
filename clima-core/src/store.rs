//! Small string key-value store for state carried between runs: the last
//! searched city, the theme and the last observed conditions.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::config::Config;

pub const LAST_CITY: &str = "lastSearchedCity";
pub const THEME: &str = "theme";
pub const LAST_WEATHER_CODE: &str = "lastWeatherCode";
pub const LAST_WIND_SPEED: &str = "lastWindSpeed";
pub const LAST_IS_DAY: &str = "lastIsDay";

pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A flat TOML table on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Config::project_dirs()?.data_dir().join("state.toml"))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(entries).context("Failed to serialize state to TOML")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("state store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("clima-store-{}-{name}", std::process::id()))
            .join("state.toml")
    }

    #[test]
    fn memory_store_overwrites() {
        let store = MemoryStore::default();
        assert_eq!(store.get(LAST_CITY), None);

        store.set(LAST_CITY, "Curitiba").unwrap();
        store.set(LAST_CITY, "Londrina").unwrap();
        assert_eq!(store.get(LAST_CITY).as_deref(), Some("Londrina"));
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = scratch_path("reopen");
        let _ = fs::remove_file(&path);

        let store = FileStore::open(&path).unwrap();
        store.set(THEME, "dark").unwrap();
        store.set(LAST_WEATHER_CODE, "61").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME).as_deref(), Some("dark"));
        assert_eq!(reopened.get(LAST_WEATHER_CODE).as_deref(), Some("61"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not = [valid").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
