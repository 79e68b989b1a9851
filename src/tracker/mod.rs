//! Persistent last-seen-version state, keyed by tracking id.
//!
//! The snapshot is a flat JSON object on disk: tracking id to version
//! string, UTF-8, human-diffable. It is loaded once at run start, read for
//! comparisons, and replaced wholesale at run end with a merged copy. A
//! missing or corrupt file is never an error; the run starts fresh instead.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while persisting tracker state.
///
/// Loading never errors; only writes do.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Serializing the snapshot to JSON failed.
    #[error("failed to serialize tracker state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the snapshot file failed.
    #[error("failed to write tracker file {path}: {source}")]
    Write {
        /// Path the write was attempted at.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Durable mapping from tracking id to the last-seen version string.
///
/// Backed by a `BTreeMap` so serialization is key-sorted and diffs between
/// runs stay stable regardless of discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerSnapshot {
    entries: BTreeMap<String, String>,
}

impl TrackerSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot from disk.
    ///
    /// A missing file means "never ran before" and a corrupt or unreadable
    /// file means "start fresh"; both yield an empty snapshot rather than an
    /// error, so a damaged state file can never wedge the run.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(snapshot) => {
                    info!(path = %path.display(), entries = snapshot.len(), "tracker state loaded");
                    snapshot
                }
                Err(error) => {
                    warn!(%error, path = %path.display(), "tracker state is corrupt, starting fresh");
                    Self::default()
                }
            },
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no tracker state found, starting fresh");
                Self::default()
            }
            Err(error) => {
                warn!(%error, path = %path.display(), "tracker state unreadable, starting fresh");
                Self::default()
            }
        }
    }

    /// Writes the snapshot to disk as pretty-printed, key-sorted JSON.
    pub fn save(&self, path: &Path) -> Result<(), TrackerError> {
        let mut serialized = serde_json::to_string_pretty(&self.entries)?;
        serialized.push('\n');
        fs::write(path, serialized).map_err(|source| TrackerError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), entries = self.len(), "tracker state saved");
        Ok(())
    }

    /// The last-seen version for a tracking id, or `None` when the artifact
    /// has never been seen.
    #[must_use]
    pub fn last_seen(&self, tracking_id: &str) -> Option<&str> {
        self.entries.get(tracking_id).map(String::as_str)
    }

    /// Records a version for a tracking id, replacing any previous entry.
    pub fn record(&mut self, tracking_id: &str, version: &str) {
        self.entries
            .insert(tracking_id.to_string(), version.to_string());
    }

    /// Returns a copy of this snapshot with the given updates applied.
    ///
    /// Only updated entries are overwritten; everything else persists as-is.
    /// This is the run-end replacement snapshot.
    #[must_use]
    pub fn merged<'a>(&self, updates: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut next = self.clone();
        for (tracking_id, version) in updates {
            next.record(tracking_id, version);
        }
        next
    }

    /// Number of tracked artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is tracked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
