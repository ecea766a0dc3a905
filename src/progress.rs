//! Learner progress and its durable storage

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Fixed storage key for the progress record
pub const PROGRESS_KEY: &str = "bol_india_progress";

/// Points awarded for each completed speaking practice
pub const POINTS_PER_PRACTICE: u32 = 10;

/// Aggregate learner progress
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub completed_lessons: Vec<String>,
    pub total_points: u32,
    pub streak: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            completed_lessons: Vec::new(),
            total_points: 0,
            streak: 1,
        }
    }
}

impl UserProgress {
    /// Add points, never decreasing the total
    pub const fn award(&mut self, points: u32) {
        self.total_points = self.total_points.saturating_add(points);
    }
}

/// Durable storage for the progress record
pub trait ProgressStore: Send {
    /// Read the stored record, `None` if nothing has been saved yet
    ///
    /// # Errors
    ///
    /// Returns error if storage exists but cannot be read or parsed
    fn load(&self) -> Result<Option<UserProgress>>;

    /// Replace the stored record
    ///
    /// # Errors
    ///
    /// Returns error if the record cannot be written
    fn save(&self, progress: &UserProgress) -> Result<()>;
}

/// Load progress, treating absent or unreadable storage as empty progress
pub fn load_or_default(store: &dyn ProgressStore) -> UserProgress {
    match store.load() {
        Ok(Some(progress)) => {
            tracing::debug!(points = progress.total_points, "loaded progress");
            progress
        }
        Ok(None) => {
            tracing::debug!("no saved progress, starting fresh");
            UserProgress::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load progress, starting fresh");
            UserProgress::default()
        }
    }
}

/// Progress stored as a JSON file in the data directory
pub struct FileProgressStore {
    path: PathBuf,
}

impl FileProgressStore {
    /// Store the record under the fixed key inside `data_dir`
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{PROGRESS_KEY}.json")),
        }
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for FileProgressStore {
    fn load(&self) -> Result<Option<UserProgress>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let progress = serde_json::from_str(&content).map_err(|e| {
            Error::Storage(format!("failed to parse {}: {e}", self.path.display()))
        })?;
        Ok(Some(progress))
    }

    fn save(&self, progress: &UserProgress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(progress)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            points = progress.total_points,
            "saved progress"
        );
        Ok(())
    }
}

/// In-memory store holding the serialized record
///
/// Clones share the same slot, so a second store built from a clone sees
/// what the first saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryProgressStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized record, if any
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Option<UserProgress>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| Error::Storage("progress slot poisoned".to_string()))?;
        slot.as_deref()
            .map(|json| serde_json::from_str(json).map_err(Error::from))
            .transpose()
    }

    fn save(&self, progress: &UserProgress) -> Result<()> {
        let json = serde_json::to_string(progress)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| Error::Storage("progress slot poisoned".to_string()))?;
        *slot = Some(json);
        Ok(())
    }
}
