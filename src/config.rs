//! Configuration loading and management
//!
//! Handles parsing of the optional `taskline.toml` in the data directory.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::Priority;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File layout inside the data directory
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification configuration
    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Task defaults
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// File layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Accounts file name
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,

    /// Directory holding one task file per account
    #[serde(default = "default_tasks_dir")]
    pub tasks_dir: String,
}

fn default_accounts_file() -> String {
    "accounts.txt".to_string()
}

fn default_tasks_dir() -> String {
    "tasks".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            accounts_file: default_accounts_file(),
            tasks_dir: default_tasks_dir(),
        }
    }
}

/// Alert configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Width of the due-soon window in hours
    #[serde(default = "default_due_soon_hours")]
    pub due_soon_hours: u32,
}

fn default_due_soon_hours() -> u32 {
    24
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            due_soon_hours: default_due_soon_hours(),
        }
    }
}

impl AlertsConfig {
    pub fn due_soon_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.due_soon_hours))
    }
}

/// Task defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Priority used by `task add` when none is given
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_priority() -> String {
    Priority::Medium.as_str().to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `taskline.toml` from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(crate::storage::CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        validate_file_name(&self.storage.accounts_file, "storage.accounts_file")?;
        validate_file_name(&self.storage.tasks_dir, "storage.tasks_dir")?;

        if self.alerts.due_soon_hours == 0 {
            return Err(Error::InvalidConfig(
                "alerts.due_soon_hours must be > 0".to_string(),
            ));
        }

        self.tasks
            .default_priority
            .parse::<Priority>()
            .map_err(|_| {
                Error::InvalidConfig(format!(
                    "tasks.default_priority: invalid priority '{}' (expected High|Medium|Low)",
                    self.tasks.default_priority
                ))
            })?;

        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidConfig(format!("{field} cannot be empty")));
    }
    if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
        return Err(Error::InvalidConfig(format!(
            "{field}: '{name}' must be a plain file name"
        )));
    }
    Ok(())
}
