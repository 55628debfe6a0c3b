//! Durable snapshots of the transition history.
//!
//! One snapshot file per monitored target. Saving writes to a temporary file
//! in the same directory and renames it over the old snapshot, so a reader
//! never observes a half-written file and a crash mid-save leaves the
//! previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::history::History;

/// Errors raised by snapshot load/save.
///
/// `Corrupt` is kept distinct from plain I/O failure so startup can refuse to
/// run on an unreadable snapshot instead of silently discarding history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Load/save of the history snapshot for one target.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store whose snapshot path is derived from the target
    /// identifier, e.g. `<state_dir>/192.168.1.17.json`.
    pub fn for_target<P: AsRef<Path>>(state_dir: P, target: &str) -> Self {
        Self {
            path: state_dir.as_ref().join(format!("{target}.json")),
        }
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, or an empty history if none exists yet.
    ///
    /// A missing file is the normal cold-start condition. A file that exists
    /// but does not parse is reported as [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<History, StoreError> {
        if !self.path.is_file() {
            tracing::debug!(path = %self.path.display(), "No history snapshot; starting cold");
            return Ok(History::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let history: History =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            path = %self.path.display(),
            entries = history.len(),
            "Loaded history snapshot"
        );
        Ok(history)
    }

    /// Replace the snapshot with the given history.
    ///
    /// Writes to a sibling temporary file first and renames it into place, so
    /// the previous snapshot stays readable until the new one is complete.
    pub fn save(&self, history: &History) -> Result<(), StoreError> {
        let json = serde_json::to_string(history).map_err(StoreError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Observation, Policy};
    use chrono::{Local, TimeZone};
    use std::io::Write;

    fn sample_history() -> History {
        let mut history = History::new();
        let policy = Policy::default();
        for (m, online) in [(0, true), (10, false), (15, true)] {
            let ts = Local.with_ymd_and_hms(2024, 3, 4, 10, m, 0).unwrap();
            history.apply(Observation::new(ts, online), &policy);
        }
        history
    }

    #[test]
    fn test_missing_snapshot_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::for_target(dir.path(), "10.0.0.1");
        let history = store.load().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::for_target(dir.path(), "10.0.0.1");
        let history = sample_history();

        store.save(&history).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::for_target(dir.path(), "10.0.0.1");

        store.save(&History::new()).unwrap();
        let history = sample_history();
        store.save(&history).unwrap();

        assert_eq!(store.load().unwrap(), history);
        // No stray temporary file left behind
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::for_target(dir.path(), "10.0.0.1");
        let mut file = std::fs::File::create(store.path()).unwrap();
        writeln!(file, "not valid json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn test_snapshot_path_is_derived_from_target() {
        let store = HistoryStore::for_target("/var/lib/upwatch", "192.168.1.17");
        assert_eq!(
            store.path(),
            Path::new("/var/lib/upwatch/192.168.1.17.json")
        );
    }
}
