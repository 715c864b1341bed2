use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "mot-magique";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// State lives under $HOME/.local/state when HOME is set
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(pd) = Self::project_dirs() {
            pd.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn high_score_path() -> PathBuf {
        Self::state_dir().join("high_score.json")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("mot-magique.log")
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = Self::project_dirs() {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("mot_magique_config.json")
        }
    }
}
