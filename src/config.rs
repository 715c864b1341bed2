use crate::app_dirs::AppDirs;
use crate::letter_pool::DEFAULT_POOL_SIZE;
use crate::session::{Difficulty, Rules};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub difficulty: Difficulty,
    pub round_secs: u32,
    pub hints_per_game: u32,
    pub pool_size: usize,
    pub streak_for_life: u32,
    pub transition_ms: u64,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            round_secs: 60,
            hints_per_game: 3,
            pool_size: DEFAULT_POOL_SIZE,
            streak_for_life: 5,
            transition_ms: 1500,
            sound: true,
        }
    }
}

impl Config {
    pub fn rules(&self) -> Rules {
        Rules {
            round_secs: self.round_secs,
            hints_per_game: self.hints_per_game,
            pool_size: self.pool_size,
            streak_for_life: self.streak_for_life,
            transition: Duration::from_millis(self.transition_ms),
            ..Rules::default()
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!(path = %self.path.display(), "ignoring config: {e}"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
