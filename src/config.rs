//! Application configuration
//!
//! Handles loading defaults for opening discs from bluread.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::disc::OpenOptions;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "bluread.json";

/// Global application config
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application config
pub fn get_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::load)
}

/// Root application configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// KEYDB.cfg location used when none is given on the command line
    #[serde(default)]
    pub key_db: Option<PathBuf>,
    /// Hand the key database to the native library when opening
    #[serde(default)]
    pub forward_key_db: bool,
    /// Native title filter flags
    #[serde(default)]
    pub title_flags: u8,
    /// Skip titles shorter than this many seconds
    #[serde(default)]
    pub min_title_length: u32,
    /// Indent the XML report
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_db: None,
            forward_key_db: false,
            title_flags: 0,
            min_title_length: 0,
            pretty: default_pretty(),
        }
    }
}

impl AppConfig {
    /// Load configuration from bluread.json
    pub fn load() -> Self {
        // Try to load from current directory first
        if let Ok(config) = Self::load_from_path(CONFIG_FILE) {
            log::info!("Loaded config from ./{}", CONFIG_FILE);
            return config;
        }

        // Try to load from executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let config_path = exe_dir.join(CONFIG_FILE);
                if let Ok(config) = Self::load_from_path(&config_path) {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
            }
        }

        log::debug!("No {} found, using defaults", CONFIG_FILE);
        Self::default()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Options for opening discs with this configuration
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            title_flags: self.title_flags,
            min_title_length: self.min_title_length,
            forward_key_db: self.forward_key_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = write_config("{}");
        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.pretty);
        assert_eq!(config.open_options(), OpenOptions::default());
    }

    #[test]
    fn test_config_values() {
        let file = write_config(
            r#"{
                "key_db": "/home/user/.config/aacs/KEYDB.cfg",
                "forward_key_db": true,
                "min_title_length": 120,
                "pretty": false
            }"#,
        );
        let config = AppConfig::load_from_path(file.path()).unwrap();

        assert_eq!(config.key_db, Some(PathBuf::from("/home/user/.config/aacs/KEYDB.cfg")));
        assert!(!config.pretty);

        let options = config.open_options();
        assert!(options.forward_key_db);
        assert_eq!(options.min_title_length, 120);
        assert_eq!(options.title_flags, 0);
    }

    #[test]
    fn test_invalid_config() {
        let file = write_config("{ \"pretty\": \"yes\" }");
        assert!(AppConfig::load_from_path(file.path()).is_err());
        assert!(AppConfig::load_from_path("/nonexistent/bluread.json").is_err());
    }
}
