use crate::app_dirs::AppDirs;
use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence for the single best score.
pub trait HighScoreStore {
    /// Missing or unreadable data reads as 0.
    fn load(&self) -> u32;
    fn save(&self, score: u32) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct HighScoreRecord {
    score: u32,
    achieved_at: DateTime<Local>,
}

/// JSON file under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::high_score_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    fn read_record(&self) -> Option<HighScoreRecord> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        self.read_record().map(|r| r.score).unwrap_or(0)
    }

    fn save(&self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let record = HighScoreRecord {
            score,
            achieved_at: Local::now(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&record)?)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryHighScoreStore {
    score: Cell<u32>,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        Self {
            score: Cell::new(score),
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score.get()
    }

    fn save(&self, score: u32) -> Result<()> {
        self.score.set(score);
        Ok(())
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for std::rc::Rc<S> {
    fn load(&self) -> u32 {
        (**self).load()
    }

    fn save(&self, score: u32) -> Result<()> {
        (**self).save(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_zero() {
        let dir = tempdir().unwrap();
        let store = FileHighScoreStore::with_path(dir.path().join("high_score.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("high_score.json");
        let store = FileHighScoreStore::with_path(&path);
        store.save(155).unwrap();

        assert_eq!(store.load(), 155);
        assert!(store.read_record().is_some());
        assert_eq!(FileHighScoreStore::with_path(&path).load(), 155);
    }

    #[test]
    fn corrupt_file_reads_zero() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("high_score.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(FileHighScoreStore::with_path(&path).load(), 0);
    }

    #[test]
    fn memory_store() {
        let store = MemoryHighScoreStore::new(10);
        assert_eq!(store.load(), 10);
        store.save(42).unwrap();
        assert_eq!(store.load(), 42);
    }
}
