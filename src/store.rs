//! Persisted "current track" state
//!
//! The watcher records the most recent playable track as JSON under the data
//! directory so share text can be re-rendered later (`nowshare last`)
//! without a player running.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::track::TrackInfo;

const STATE_FILE: &str = "current_track.json";

/// File-backed store for the most recently seen track.
#[derive(Debug, Clone)]
pub struct TrackStore {
    path: PathBuf,
}

impl TrackStore {
    /// Store rooted at the given data directory.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STATE_FILE),
        }
    }

    /// Replace the stored track.
    pub fn save(&self, track: &TrackInfo) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(track)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// The stored track, or `None` when nothing has been recorded yet.
    pub fn load(&self) -> Result<Option<TrackInfo>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Path of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
