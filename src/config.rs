/// Deployment configuration
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the flat data files
    pub data_dir: PathBuf,
    /// Scope task and history records to the signed-in account
    #[serde(default)]
    pub multi_user: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            multi_user: false,
        }
    }
}

impl Config {
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join("tasks.txt")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.txt")
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("Users.txt")
    }
}

/// Get the plaintask data directory
/// All platforms: ~/.plaintask
pub fn get_data_dir() -> PathBuf {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .expect("Failed to get home directory");
    PathBuf::from(home_dir).join(".plaintask")
}

/// Get the config file path (<data_dir>/config.toml)
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load the configuration, falling back to defaults when no config file
/// exists yet
pub fn load_config() -> Result<Config> {
    let config_path = get_config_path();

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config)
}

/// Save the configuration
pub fn save_config(config: &Config) -> Result<()> {
    let config_path = get_config_path();

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(config_path, content)?;

    Ok(())
}
