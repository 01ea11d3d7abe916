use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AlmanacError, Result};

/// Top-level configuration for the Almanac application.
///
/// Loaded from `~/.almanac/config.toml` by default. Every section has full
/// defaults so a missing or partial file still yields a working config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlmanacConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for AlmanacConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            reminders: ReminderConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

impl AlmanacConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AlmanacConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AlmanacError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory holding the event slot.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.almanac/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Reminder scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Offsets before event start at which reminders fire, in minutes.
    pub offsets_minutes: Vec<u32>,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            offsets_minutes: vec![15, 10, 5],
        }
    }
}

/// Calendar display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Initial widget view: "month", "week", or "day".
    pub default_view: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_view: "month".to_string(),
        }
    }
}
