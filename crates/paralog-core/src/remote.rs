//! [`RemoteLogService`] backed by external commands.
//!
//! The job scheduler service exposes its log level property and log
//! retrieval through its own administration tooling. Each operation is an
//! argv template; the profile name and the level or destination directory are
//! appended as the final arguments:
//!
//! ```text
//! <set_level_command...>     <profile> <level>
//! <retrieve_logs_command...> <profile> <destination>
//! ```

use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::ClusterRef;
use crate::error::{ParalogError, Result};
use crate::level::LogLevel;
use crate::ports::RemoteLogService;

/// Argv templates for remote operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MjsCommands {
    /// Writes the remote log level property.
    pub set_level_command: Option<Vec<String>>,
    /// Copies remote logs into a local directory.
    pub retrieve_logs_command: Option<Vec<String>>,
}

/// Runs configured commands for MJS operations.
#[derive(Debug, Clone, Default)]
pub struct CommandRemoteService {
    commands: MjsCommands,
}

impl CommandRemoteService {
    /// Creates a service from configured commands.
    #[must_use]
    pub const fn new(commands: MjsCommands) -> Self {
        Self { commands }
    }

    fn run(
        template: Option<&Vec<String>>,
        operation: &'static str,
        trailing: [&OsStr; 2],
    ) -> Result<()> {
        let (program, args) = template
            .and_then(|argv| argv.split_first())
            .ok_or(ParalogError::RemoteUnavailable(operation))?;

        debug!(%program, operation, "running remote command");
        let output = Command::new(program)
            .args(args)
            .args(trailing)
            .output()
            .map_err(|e| ParalogError::RemoteCommandFailed {
                command: program.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParalogError::RemoteCommandFailed {
                command: program.clone(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }
}

impl RemoteLogService for CommandRemoteService {
    fn set_cluster_log_level(&mut self, cluster: &ClusterRef, level: LogLevel) -> Result<()> {
        let level = level.to_string();
        Self::run(
            self.commands.set_level_command.as_ref(),
            "set_level_command",
            [OsStr::new(cluster.label()), OsStr::new(&level)],
        )?;
        info!(cluster = cluster.label(), %level, "remote cluster log level set");
        Ok(())
    }

    fn retrieve_logs(&mut self, cluster: &ClusterRef, destination: &Path) -> Result<()> {
        Self::run(
            self.commands.retrieve_logs_command.as_ref(),
            "retrieve_logs_command",
            [OsStr::new(cluster.label()), destination.as_os_str()],
        )
    }
}
