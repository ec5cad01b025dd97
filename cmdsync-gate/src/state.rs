//! State store — persisted last-fingerprint/last-sync-time pair.
//!
//! Persists a `SavedState` JSON document at `<directory>/<filename>.json`.
//! The file is created lazily (containing `{}`) the first time a location is
//! resolved, so reads never fail due to absence. Writes use the atomic
//! `.tmp` + rename pattern.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cmdsync_core::{ConfigError, SyncScope};

use crate::error::{io_err, SyncError};

/// Default logical name of the state file (without `.json`).
pub const DEFAULT_STATE_FILENAME: &str = "cmdsync_state";

/// On-disk state payload.
///
/// Exactly two recognized fields; unknown fields are ignored on read and
/// both fields are always written. After any successful sync both are
/// present; `None`/`None` is the valid never-synced state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SavedState {
    pub last_timestamp: Option<i64>,
    pub last_hex: Option<String>,
}

// ---------------------------------------------------------------------------
// StateLocation
// ---------------------------------------------------------------------------

/// A directory + logical name pair resolving to exactly one state file.
///
/// The resolved path is purely derived and cached; mutating either component
/// clears the cache so the next access re-resolves and re-ensures existence.
#[derive(Debug, Clone)]
pub struct StateLocation {
    directory: PathBuf,
    filename: String,
    resolved: Option<PathBuf>,
}

impl StateLocation {
    /// Build a location from a directory and a logical filename.
    ///
    /// A trailing `.json` on `filename` is stripped; an empty name is a
    /// caller bug.
    pub fn new(directory: impl Into<PathBuf>, filename: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            directory: directory.into(),
            filename: normalize_filename(filename)?,
            resolved: None,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        let directory = directory.into();
        tracing::debug!(
            "retargeting state directory from {} to {}",
            self.directory.display(),
            directory.display()
        );
        self.directory = directory;
        self.resolved = None;
    }

    fn set_filename(&mut self, filename: &str) -> Result<(), ConfigError> {
        let filename = normalize_filename(filename)?;
        tracing::debug!(
            "retargeting state filename from {} to {}",
            self.filename,
            filename
        );
        self.filename = filename;
        self.resolved = None;
        Ok(())
    }

    /// Resolve the backing file path, creating parent directories and an
    /// empty `{}` file if nothing exists there yet. Cached until the
    /// directory or filename changes.
    fn resolve(&mut self) -> Result<&Path, SyncError> {
        if self.resolved.is_none() {
            let path = self.directory.join(format!("{}.json", self.filename));
            ensure_exists(&path)?;
            self.resolved = Some(path);
        }
        // Filled above.
        Ok(self.resolved.as_deref().unwrap())
    }
}

fn normalize_filename(filename: &str) -> Result<String, ConfigError> {
    let name = filename.strip_suffix(".json").unwrap_or(filename);
    if name.is_empty() {
        return Err(ConfigError::EmptyFilename);
    }
    Ok(name.to_string())
}

fn ensure_exists(path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if !path.exists() {
        std::fs::write(path, "{}").map_err(|e| io_err(path, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Durable store for one [`SavedState`] record with an in-memory cache.
#[derive(Debug)]
pub struct StateStore {
    location: StateLocation,
    cached: Option<SavedState>,
}

impl StateStore {
    pub fn new(location: StateLocation) -> Self {
        Self {
            location,
            cached: None,
        }
    }

    /// Store at `<directory>/<filename>.json`.
    pub fn at(directory: impl Into<PathBuf>, filename: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(StateLocation::new(directory, filename)?))
    }

    /// Store for one sync scope, named `cmdsync_state_<scope>`.
    pub fn for_scope(directory: impl Into<PathBuf>, scope: SyncScope) -> Self {
        Self::new(StateLocation {
            directory: directory.into(),
            filename: format!("{}_{}", DEFAULT_STATE_FILENAME, scope.label()),
            resolved: None,
        })
    }

    pub fn location(&self) -> &StateLocation {
        &self.location
    }

    /// Retarget the backing directory. The next access re-resolves the path
    /// and reloads from the new location.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.location.set_directory(directory);
        self.cached = None;
    }

    /// Retarget the logical filename. The next access re-resolves the path
    /// and reloads from the new location.
    pub fn set_filename(&mut self, filename: &str) -> Result<(), ConfigError> {
        self.location.set_filename(filename)?;
        self.cached = None;
        Ok(())
    }

    /// Resolve the backing file path, creating it if absent.
    pub fn resolve(&mut self) -> Result<PathBuf, SyncError> {
        Ok(self.location.resolve()?.to_path_buf())
    }

    /// Return the state, reading the backing file on first access or when
    /// `force_reload` is set.
    ///
    /// Read and decode failures are recovered by falling back to the
    /// never-synced state: corrupted state must only force a resync, never
    /// crash the caller.
    pub fn load(&mut self, force_reload: bool) -> &SavedState {
        if self.cached.is_none() || force_reload {
            self.cached = Some(self.read_state());
        }
        // Filled above.
        self.cached.as_ref().unwrap()
    }

    fn read_state(&mut self) -> SavedState {
        let path = match self.location.resolve() {
            Ok(path) => path.to_path_buf(),
            Err(e) => {
                tracing::warn!("cannot resolve state file: {e}; treating as never synced");
                return SavedState::default();
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<SavedState>(&contents) {
                Ok(state) => {
                    tracing::info!("loaded sync state from {}", path.display());
                    state
                }
                Err(e) => {
                    tracing::warn!(
                        "invalid sync state at {}: {e}; treating as never synced",
                        path.display()
                    );
                    SavedState::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "cannot read sync state at {}: {e}; treating as never synced",
                    path.display()
                );
                SavedState::default()
            }
        }
    }

    /// Record a successful sync: set the fingerprint and stamp the current
    /// time, then write the whole record atomically and refresh the cache.
    ///
    /// Write failures are fatal; the backing file keeps its last-known-good
    /// contents.
    pub fn update(&mut self, fingerprint: &str) -> Result<(), SyncError> {
        self.load(false);
        let state = SavedState {
            last_timestamp: Some(Utc::now().timestamp()),
            last_hex: Some(fingerprint.to_string()),
        };
        tracing::info!("updating sync state: new fingerprint {fingerprint}");

        let path = self.location.resolve()?.to_path_buf();
        let json = serde_json::to_string_pretty(&state)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&path, e));
        }

        self.cached = Some(state);
        Ok(())
    }

    /// Unix seconds of the last successful sync, if any.
    pub fn last_timestamp(&mut self) -> Option<i64> {
        self.load(false).last_timestamp
    }

    /// When the last successful sync occurred.
    pub fn last_synced_at(&mut self) -> Option<DateTime<Utc>> {
        let secs = self.last_timestamp()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// Fingerprint recorded by the last successful sync, if any.
    pub fn last_fingerprint(&mut self) -> Option<String> {
        self.load(false).last_hex.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
