//! File-backed persistence for game and per-day records.
//!
//! Layout under the save directory:
//!
//! ```text
//! <root>/game_state.json       GameSave
//! <root>/days/YYYY-MM-DD.json  DailySave, one per day with catches
//! ```
//!
//! Every write goes to a sibling `.tmp` file first and is then renamed over
//! the target, so a crash mid-write leaves the previous record intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::records::{DailySave, GameSave, day_key, parse_day_key};

/// File name of the main game record.
const GAME_FILE: &str = "game_state.json";

/// Directory holding the per-day records.
const DAYS_DIR: &str = "days";

/// Extension used for every record file.
const JSON_EXT: &str = "json";

/// Reads and writes save records under a single root directory.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl SaveStore {
    /// Create a store rooted at `root` without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store and make sure its directory layout exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if a directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(root);
        store.ensure_layout()?;
        Ok(store)
    }

    /// The root save directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the main game record.
    pub fn game_path(&self) -> PathBuf {
        self.root.join(GAME_FILE)
    }

    /// Path of the record for `date`.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.days_dir().join(format!("{}.{JSON_EXT}", day_key(date)))
    }

    fn days_dir(&self) -> PathBuf {
        self.root.join(DAYS_DIR)
    }

    /// Create the root and `days/` directories if they are missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if a directory cannot be created.
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        let days = self.days_dir();
        fs::create_dir_all(&days).map_err(|e| StoreError::io(days, e))
    }

    // =========================================================================
    // Game record
    // =========================================================================

    /// Write the main game record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or writing fails. The previous
    /// record on disk is left untouched in that case.
    pub fn write_game(&self, save: &GameSave) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        write_json(&self.game_path(), save)
    }

    /// Read the main game record. Returns `Ok(None)` when no save exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn read_game(&self) -> Result<Option<GameSave>, StoreError> {
        read_json(&self.game_path())
    }

    // =========================================================================
    // Day records
    // =========================================================================

    /// Write (replace) the record for `day.date`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if encoding or writing fails.
    pub fn write_day(&self, day: &DailySave) -> Result<(), StoreError> {
        self.ensure_layout()?;
        write_json(&self.day_path(day.date), day)
    }

    /// Read the record for `date`. Returns `Ok(None)` if that day has none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn read_day(&self, date: NaiveDate) -> Result<Option<DailySave>, StoreError> {
        read_json(&self.day_path(date))
    }

    /// Read every day record in the `days/` directory, keyed by date.
    ///
    /// Files whose names are not `YYYY-MM-DD.json` are ignored. Files that
    /// fail to parse are logged and skipped so one damaged day does not hide
    /// the rest of the history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory itself cannot be listed.
    pub fn read_all_days(&self) -> Result<BTreeMap<NaiveDate, DailySave>, StoreError> {
        let dir = self.days_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io(dir, e)),
        };

        let mut days = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            let Some(date) = day_from_path(&path) else {
                continue;
            };
            match read_json::<DailySave>(&path) {
                Ok(Some(mut record)) => {
                    if record.date != date {
                        warn!(
                            path = %path.display(),
                            recorded = %record.date,
                            "day record date does not match file name, using file name"
                        );
                        record.date = date;
                    }
                    days.insert(date, record);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "skipping unreadable day record"),
            }
        }
        debug!(days = days.len(), "day records loaded");
        Ok(days)
    }
}

/// Extract the date from a `days/YYYY-MM-DD.json` path.
fn day_from_path(path: &Path) -> Option<NaiveDate> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(JSON_EXT) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    parse_day_key(stem)
}

/// Serialize `value` and atomically replace `path` with it.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StoreError::serialization(path, e))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Read and decode `path`, mapping a missing file to `Ok(None)`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StoreError::serialization(path, e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn day_paths_live_under_days_dir() {
        let store = SaveStore::new("/saves");
        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_eq!(store.day_path(date), PathBuf::from("/saves/days/2026-01-02.json"));
        assert_eq!(store.game_path(), PathBuf::from("/saves/game_state.json"));
    }

    #[test]
    fn only_dated_json_files_are_day_records() {
        assert!(day_from_path(Path::new("/s/days/2026-01-02.json")).is_some());
        assert!(day_from_path(Path::new("/s/days/2026-01-02.json.tmp")).is_none());
        assert!(day_from_path(Path::new("/s/days/notes.json")).is_none());
        assert!(day_from_path(Path::new("/s/days/2026-01-02.txt")).is_none());
    }
}
