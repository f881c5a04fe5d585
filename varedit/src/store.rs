use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use log::{debug, info};
use thiserror::Error;

use crate::value::Value;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not read settings from {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write settings to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not parse settings in {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Could not serialize settings")]
    Serialize(#[from] toml::ser::Error),
}

/// Persistent key/value settings.
pub trait SettingsStore {
    fn value(&self, key: &str) -> Option<Value>;
    fn set_value(&mut self, key: &str, value: Value);

    fn value_or(&self, key: &str, default: Value) -> Value {
        self.value(key).unwrap_or(default)
    }

    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }
}

/// Settings kept in a flat TOML table. Changes stay in memory until `save`.
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    dirty: bool,
}

impl TomlStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values: BTreeMap<String, Value> = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).map_err(|source| StoreError::Parse{path: path.clone(), source})?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StoreError::Read{path, source}),
        };

        Ok(Self { path, values, dirty: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let s = toml::to_string(&self.values)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write{path: self.path.clone(), source})?;
        }
        // Written beside the target, then renamed over it.
        let tmp = self.temp_path();
        fs::write(&tmp, s).map_err(|source| StoreError::Write{path: tmp.clone(), source})?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write{path: self.path.clone(), source})?;
        self.dirty = false;
        info!("Saved {} settings to {}", self.values.len(), self.path.display());

        Ok(())
    }
}

impl SettingsStore for TomlStore {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: Value) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }
}
