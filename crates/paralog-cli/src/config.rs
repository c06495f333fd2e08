//! Tool configuration.
//!
//! Loaded from a JSON file (by default `<config_dir>/paralog/config.json`):
//!
//! ```json
//! {
//!   "prefs_dir": "/home/me/.config/paralog",
//!   "default_profile": "Processes",
//!   "profiles": [
//!     { "name": "Processes", "type": "Local", "job_storage": "/home/me/jobs" },
//!     { "name": "prod", "type": "MJS" }
//!   ],
//!   "mjs": { "set_level_command": ["mjs-admin", "set-log-level"] }
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use paralog_core::{ClusterProfile, LogLocations, MjsCommands, ProfileRegistry, SignalNames};

use crate::error::CliError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "PARALOG_CONFIG";

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParalogConfig {
    /// Preferences root holding `ParallelLogs`.
    pub prefs_dir: Option<PathBuf>,
    /// Parent of staging directories; system temp dir when unset.
    pub staging_dir: Option<PathBuf>,
    /// Profile used when none is given.
    pub default_profile: Option<String>,
    /// Configured cluster profiles.
    pub profiles: Vec<ClusterProfile>,
    /// Exported environment variable names.
    pub signals: SignalNames,
    /// Remote commands for MJS clusters.
    pub mjs: MjsCommands,
}

impl ParalogConfig {
    /// Default config file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("paralog").join("config.json"))
    }

    /// Loads `path`, or the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| CliError::Config(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), CliError> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(CliError::Config("profile name cannot be empty".to_string()));
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(CliError::Config(format!(
                    "duplicate profile '{}'",
                    profile.name
                )));
            }
        }

        if let Some(default) = &self.default_profile {
            if !seen.contains(default.as_str()) {
                return Err(CliError::Config(format!(
                    "default_profile '{default}' is not a configured profile"
                )));
            }
        }

        for (key, argv) in [
            ("mjs.set_level_command", &self.mjs.set_level_command),
            ("mjs.retrieve_logs_command", &self.mjs.retrieve_logs_command),
        ] {
            if argv.as_ref().is_some_and(Vec::is_empty) {
                return Err(CliError::Config(format!("{key} cannot be empty")));
            }
        }

        Ok(())
    }

    /// Log locations for this configuration.
    #[must_use]
    pub fn locations(&self) -> LogLocations {
        LogLocations::discover(self.prefs_dir.as_deref())
    }

    /// Profile registry for this configuration.
    #[must_use]
    pub fn registry(&self) -> ProfileRegistry {
        ProfileRegistry::new(self.profiles.clone(), self.default_profile.clone())
    }
}
