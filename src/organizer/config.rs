use crate::error::{OrganizerError, Result};
use crate::services::addressbook::DEFAULT_BIRTHDAY_WINDOW;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Keys accepted by [`OrganizerConfig::get`] and [`OrganizerConfig::set`].
pub const CONFIG_KEYS: [&str; 3] = ["birthday-days", "autosave", "log-level"];

/// Configuration for the organizer, stored in `<data-dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizerConfig {
    /// Days ahead `contact birthdays` looks when no `--days` is given
    #[serde(default = "default_birthday_window")]
    pub birthday_window_days: u32,

    /// Write collections back to disk after every change
    #[serde(default = "default_autosave")]
    pub autosave: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_birthday_window() -> u32 {
    DEFAULT_BIRTHDAY_WINDOW
}

fn default_autosave() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            birthday_window_days: default_birthday_window(),
            autosave: default_autosave(),
            log_level: default_log_level(),
        }
    }
}

impl OrganizerConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(OrganizerError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            OrganizerError::Config(format!("{}: {}", config_path.display(), e))
        })
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(OrganizerError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(OrganizerError::Serialization)?;
        fs::write(config_path, content).map_err(OrganizerError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "birthday-days" => Ok(self.birthday_window_days.to_string()),
            "autosave" => Ok(self.autosave.to_string()),
            "log-level" => Ok(self.log_level.clone()),
            other => Err(unknown_key(other)),
        }
    }

    /// Parses `value` for `key` and stores it. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "birthday-days" => {
                self.birthday_window_days = value.parse().map_err(|_| {
                    OrganizerError::Config(format!(
                        "birthday-days must be a non-negative number, got '{}'",
                        value
                    ))
                })?;
            }
            "autosave" => {
                self.autosave = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => {
                        return Err(OrganizerError::Config(format!(
                            "autosave must be true or false, got '{}'",
                            value
                        )))
                    }
                };
            }
            "log-level" => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(OrganizerError::Config(format!(
                        "log-level must be one of {}, got '{}'",
                        LOG_LEVELS.join("|"),
                        value
                    )));
                }
                self.log_level = level;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> OrganizerError {
    OrganizerError::Config(format!(
        "Unknown config key '{}'. Available: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
