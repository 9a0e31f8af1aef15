use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::CodestampError;

/// Author name used when nothing is configured.
pub const DEFAULT_AUTHOR: &str = "User";

pub struct Config {
    author_name: String,
    git_path: String,
    revert_detection: bool,
}

#[derive(Deserialize, Serialize, Default)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_detection: Option<bool>,
}

static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    /// Access the global configuration. Lazily initializes if not already initialized.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(build_config)
    }

    /// Author display name written into stamp comments.
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Returns the command to invoke git.
    pub fn git_cmd(&self) -> &str {
        &self.git_path
    }

    /// Whether reverted-to-committed regions are detected and unstamped.
    pub fn revert_detection(&self) -> bool {
        self.revert_detection
    }
}

fn build_config() -> Config {
    let file_cfg = load_file_config();

    // Env var takes precedence over the config file
    let author_name = env::var("CODESTAMP_AUTHOR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            file_cfg
                .as_ref()
                .and_then(|c| c.author_name.clone())
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

    let git_path = env::var("CODESTAMP_GIT_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            file_cfg
                .as_ref()
                .and_then(|c| c.git_path.clone())
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| "git".to_string());

    let revert_detection = file_cfg
        .as_ref()
        .and_then(|c| c.revert_detection)
        .unwrap_or(true);

    Config {
        author_name,
        git_path,
        revert_detection,
    }
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_file_path()?;
    let data = fs::read(&path).ok()?;
    serde_json::from_slice::<FileConfig>(&data).ok()
}

pub fn config_file_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".codestamp").join("config.json"))
}

/// Load the raw file config for mutation, defaulting to empty.
pub fn load_file_config_or_default() -> FileConfig {
    load_file_config().unwrap_or_default()
}

/// Persist the file config, creating `~/.codestamp` if needed.
pub fn save_file_config(cfg: &FileConfig) -> Result<(), CodestampError> {
    let path = config_file_path()
        .ok_or_else(|| CodestampError::Generic("could not determine home directory".to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(cfg)?;
    fs::write(&path, data)?;
    Ok(())
}
