use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::engine::round::Score;
use crate::error::Result;

/// File-backed store for the best score ever observed across rounds. The
/// file holds a single plain-text integer.
pub(crate) struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the record. A missing, empty, or malformed file counts as a
    /// record of 0; a corrupt score file must never take the game down.
    pub(crate) fn load(&self) -> Score {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                log::warn!("failed to read record file {}: {}", self.path.display(), e);
                return 0;
            }
        };
        match contents.trim().parse() {
            Ok(record) => record,
            Err(_) => {
                log::warn!(
                    "record file {} holds {:?}, not a score; treating as 0",
                    self.path.display(),
                    contents.trim(),
                );
                0
            }
        }
    }

    /// Persist the given score if it beats the stored record. The file is
    /// overwritten, never appended.
    pub(crate) fn save(&self, score: Score) -> Result<()> {
        if score <= self.load() {
            return Ok(());
        }
        log::info!("new record {}, persisting to {}", score, self.path.display());
        fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}
