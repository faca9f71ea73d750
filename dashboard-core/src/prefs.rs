//! Persistent key-value preferences.

use anyhow::{Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

pub const THEME_KEY: &str = "theme";

pub trait PreferenceStore: Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-persistent store, for tests and one-off runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat TOML file of string values, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlPreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse preferences: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }
        let toml = toml::to_string(&self.values).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}
