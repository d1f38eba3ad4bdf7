// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovery registry: atomic host-wide singleton enforcement (spec.md §4.A).
//!
//! Uses `fs2::FileExt::try_lock_exclusive` for create-exclusive lock-file
//! semantics (PID written into the held file), extended with the JSON
//! document spec.md §6 asks the registry file to carry.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Published once this process becomes the registered daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub pid: u32,
    pub http_port: u16,
    pub ws_port: u16,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("another daemon is already running (pid {})", .existing.pid)]
    AlreadyRunning { existing: RegistryInfo },
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry file was corrupt: {0}")]
    Corrupt(String),
}

/// A file-backed discovery registry at a well-known per-user path.
pub struct Registry {
    path: PathBuf,
    /// Held open for the lifetime of `Registry` once registered; its
    /// exclusive lock is what makes `register` atomic across processes.
    lock_file: Option<File>,
}

impl Registry {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock_file: None }
    }

    pub fn default_path() -> PathBuf {
        let dir = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(std::env::temp_dir);
        dir.join("fmdmd").join("daemon.json")
    }

    /// Register the current process as the host's daemon. Atomic: either
    /// this call wins the exclusive lock or it fails with `AlreadyRunning`.
    pub fn register(&mut self, info: RegistryInfo) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&self.path)?;

        if file.try_lock_exclusive().is_err() {
            let existing = read_info(&self.path).unwrap_or(None);
            return match existing {
                Some(existing) if is_alive(existing.pid) => Err(RegistryError::AlreadyRunning { existing }),
                // Stale entry: the lock call raced a writer mid-cleanup, or
                // holds a dead pid. Treat as absent and let the caller retry
                // `register` once more; surfacing `AlreadyRunning` with a
                // stale pid would be misleading.
                _ => Err(RegistryError::Corrupt("lock held but registrant is not alive".to_string())),
            };
        }

        let mut file = file;
        file.set_len(0)?;
        let body = serde_json::to_vec_pretty(&info).map_err(|e| RegistryError::Corrupt(e.to_string()))?;
        file.write_all(&body)?;
        file.flush()?;

        self.lock_file = Some(file);
        info!(pid = info.pid, ws_port = info.ws_port, "registered as the daemon for this host");
        Ok(())
    }

    /// Discover the currently registered daemon, skipping stale (dead-pid)
    /// entries.
    pub fn discover(path: &Path) -> Option<RegistryInfo> {
        let info = read_info(path).ok().flatten()?;
        if is_alive(info.pid) {
            Some(info)
        } else {
            warn!(pid = info.pid, "registry entry is stale, ignoring");
            None
        }
    }

    /// Remove the registry entry iff it matches this process's pid.
    pub fn cleanup(&mut self) {
        let my_pid = std::process::id();
        if let Ok(Some(info)) = read_info(&self.path) {
            if info.pid == my_pid {
                let _ = fs::remove_file(&self.path);
            }
        }
        self.lock_file = None;
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        if self.lock_file.is_some() {
            self.cleanup();
        }
    }
}

fn read_info(path: &Path) -> Result<Option<RegistryInfo>, RegistryError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text).map(Some).map_err(|e| RegistryError::Corrupt(e.to_string()))
}

fn is_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

