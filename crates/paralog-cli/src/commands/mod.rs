//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`set`] - Enable, change or disable logging
//! - [`gather`] - Collect logs into an archive
//! - [`status`] - Show the persisted logging signals
//! - [`profiles`] - List configured cluster profiles
//! - [`env`] - Print the environment script

pub mod env;
pub mod gather;
pub mod profiles;
pub mod set;
pub mod status;

pub use env::EnvCommand;
pub use gather::GatherCommand;
pub use profiles::ProfilesCommand;
pub use set::SetCommand;
pub use status::StatusCommand;

use paralog_core::LogLocations;

use crate::config::ParalogConfig;

/// Configuration and resolved locations shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration.
    pub config: ParalogConfig,
    /// Log locations under the preferences root.
    pub locations: LogLocations,
}

impl Context {
    /// Builds a context from configuration.
    #[must_use]
    pub fn new(config: ParalogConfig) -> Self {
        let locations = config.locations();
        Self { config, locations }
    }

    /// Uses explicit locations instead of resolving them from configuration.
    #[must_use]
    pub const fn with_locations(config: ParalogConfig, locations: LogLocations) -> Self {
        Self { config, locations }
    }
}
