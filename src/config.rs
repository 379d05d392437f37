//! Configuration file handling.
//!
//! A single JSON file holding the codebases root path. Lookup order:
//! the `GROVE_CONFIG` environment variable, then the platform config
//! directory (`~/.config/grove/config.json` on Linux).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const APP_NAME: &str = "grove";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ENV_CONFIG_PATH: &str = "GROVE_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root directory the repository tree is scanned from.
    pub codebases_path: String,

    /// Where this config was loaded from; not part of the file itself.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load the configuration, returning an empty config when no file
    /// exists yet (first run).
    pub fn load() -> Result<Config> {
        let Some(path) = config_path() else {
            return Ok(Config::default());
        };
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)?;
        let mut cfg: Config =
            serde_json::from_str(&contents).map_err(|e| AppError::Config(e.to_string()))?;
        cfg.config_path = Some(path.to_path_buf());
        Ok(cfg)
    }

    pub fn save(&self) -> Result<()> {
        let path = match config_path() {
            Some(p) => p,
            None => default_config_path()?,
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data =
            serde_json::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.codebases_path.is_empty()
    }
}

/// Path of the config file, or None when neither the environment override
/// nor an existing default file is present.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let default = default_config_path().ok()?;
    default.exists().then_some(default)
}

fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| AppError::Config("no user config directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.json");

        let cfg = Config {
            codebases_path: "/home/user/codebases".to_string(),
            config_path: None,
        };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.codebases_path, "/home/user/codebases");
        assert_eq!(loaded.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn empty_config_is_unconfigured() {
        assert!(!Config::default().is_configured());
    }
}
