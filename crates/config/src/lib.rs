// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Persisted-folder-list configuration (spec.md §6 "Persisted configuration",
//! §9 Design Notes "one-way dependency: core consumes an `IConfiguration`
//! interface").
//!
//! The core daemon treats configuration as an opaque provider: it reads the
//! folder list once at startup and projects it into the FMDM, then calls
//! back into this crate on every `folder.add`/`folder.remove`. Nothing here
//! knows about the FMDM or the lifecycle manager.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One persisted `{path, model}` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderConfigEntry {
    pub path: PathBuf,
    pub model: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to write config at {path}: {source}")]
    Write { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to parse config at {path}: {source}")]
    Parse { path: PathBuf, #[source] source: toml::de::Error },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine a config directory for this user")]
    NoConfigDir,
}

/// The daemon's consumer-side view of the external configuration component.
///
/// Implementations are the sole writer of folder persistence; the daemon
/// awaits their completion and otherwise treats them as opaque (spec.md §5
/// "Shared-resource policy").
pub trait Configuration: Send + Sync + 'static {
    /// Load the persisted folder list (empty if none has ever been saved).
    fn load_folders(&self) -> Result<Vec<FolderConfigEntry>, ConfigError>;

    /// Persist the full folder list, replacing whatever was there before.
    fn save_folders(&self, folders: &[FolderConfigEntry]) -> Result<(), ConfigError>;

    /// The configured default model, if any.
    fn default_model(&self) -> Option<String>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDoc {
    #[serde(default)]
    folders: FoldersSection,
    #[serde(default)]
    defaults: DefaultsSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FoldersSection {
    #[serde(default)]
    list: Vec<FolderConfigEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DefaultsSection {
    model: Option<String>,
}

/// TOML-file-backed `Configuration`, rooted at `$XDG_CONFIG_HOME/fmdmd/config.toml`
/// (or the platform equivalent via the `dirs` crate) unless an explicit path
/// is given.
pub struct TomlFileConfiguration {
    path: PathBuf,
}

impl TomlFileConfiguration {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the default per-user config path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("fmdmd").join("config.toml"))
    }

    pub fn at_default_path() -> Result<Self, ConfigError> {
        Ok(Self::new(Self::default_path()?))
    }

    fn read_doc(&self) -> Result<ConfigDoc, ConfigError> {
        if !self.path.exists() {
            return Ok(ConfigDoc::default());
        }
        let text = fs::read_to_string(&self.path)
            .map_err(|source| ConfigError::Read { path: self.path.clone(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: self.path.clone(), source })
    }

    fn write_doc(&self, doc: &ConfigDoc) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: self.path.clone(), source })?;
        }
        let text = toml::to_string_pretty(doc)?;
        fs::write(&self.path, text).map_err(|source| ConfigError::Write { path: self.path.clone(), source })
    }
}

impl Configuration for TomlFileConfiguration {
    fn load_folders(&self) -> Result<Vec<FolderConfigEntry>, ConfigError> {
        Ok(self.read_doc()?.folders.list)
    }

    fn save_folders(&self, folders: &[FolderConfigEntry]) -> Result<(), ConfigError> {
        let mut doc = self.read_doc()?;
        doc.folders.list = folders.to_vec();
        self.write_doc(&doc)
    }

    fn default_model(&self) -> Option<String> {
        self.read_doc().ok().and_then(|doc| doc.defaults.model)
    }
}

/// In-memory `Configuration` for tests: no filesystem access.
#[derive(Default)]
pub struct MemoryConfiguration {
    inner: parking_lot::Mutex<Vec<FolderConfigEntry>>,
    default_model: Option<String>,
}

impl MemoryConfiguration {
    pub fn new(default_model: Option<String>) -> Self {
        Self { inner: Default::default(), default_model }
    }

    pub fn with_folders(folders: Vec<FolderConfigEntry>, default_model: Option<String>) -> Self {
        let cfg = Self::new(default_model);
        *cfg.inner.lock() = folders;
        cfg
    }
}

impl Configuration for MemoryConfiguration {
    fn load_folders(&self) -> Result<Vec<FolderConfigEntry>, ConfigError> {
        Ok(self.inner.lock().clone())
    }

    fn save_folders(&self, folders: &[FolderConfigEntry]) -> Result<(), ConfigError> {
        *self.inner.lock() = folders.to_vec();
        Ok(())
    }

    fn default_model(&self) -> Option<String> {
        self.default_model.clone()
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

