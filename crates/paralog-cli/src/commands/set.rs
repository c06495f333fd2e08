//! Set command implementation.
//!
//! Validates the requested levels, resolves the cluster profile and applies
//! the change through the session file and, for MJS clusters, the configured
//! remote commands.

use std::io::Write;

use tracing::debug;

use paralog_core::{
    ClusterResolver, CommandRemoteService, LevelPlan, LoggingRequest, SessionFilePort, set_logging,
};

use crate::cli::SetArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{OutputFormat, SetOutput};

/// Handler for the set command.
pub struct SetCommand<'a> {
    ctx: &'a Context,
}

impl<'a> SetCommand<'a> {
    /// Creates a new set command handler.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Executes the set command.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &SetArgs,
    ) -> Result<(), CliError> {
        let request = LoggingRequest::parse(
            &args.level,
            args.cluster_level.as_deref(),
            args.client_level.as_deref(),
        )?;
        let cluster = self.ctx.config.registry().resolve(args.profile.as_deref())?;
        debug!(cluster = cluster.label(), plan = ?request.plan(), "applying logging request");

        let mut signals = SessionFilePort::open(
            self.ctx.locations.parallel_logs_dir(),
            self.ctx.config.signals.clone(),
        )?;
        let mut remote = CommandRemoteService::new(self.ctx.config.mjs.clone());
        set_logging(&cluster, &request, &self.ctx.locations, &mut signals, &mut remote)?;

        let (action, cluster_level, client_level) = match request.plan() {
            LevelPlan::Enable { cluster, client } => ("enabled", Some(cluster), Some(client)),
            LevelPlan::Disable => ("disabled", None, None),
        };
        let output = SetOutput {
            cluster: cluster.label().to_string(),
            cluster_type: cluster.cluster_type.to_string(),
            action,
            cluster_level,
            client_level,
            client_log_dir: self.ctx.locations.client_log_dir(),
            env_script: signals.env_script_path(),
            remote_level_changed: cluster.cluster_type.is_mjs() && cluster_level.is_some(),
        };
        format.write(out, &output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::config::ParalogConfig;
    use paralog_core::LogLocations;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> Context {
        let config = ParalogConfig::from_json(
            r#"{"default_profile": "hpc", "profiles": [{"name": "hpc", "type": "HPCServer"}]}"#,
        )
        .expect("config");
        Context::with_locations(config, LogLocations::new(dir.path()))
    }

    fn args(level: &str) -> SetArgs {
        SetArgs {
            level: level.to_string(),
            profile: None,
            cluster_level: None,
            client_level: None,
        }
    }

    #[test]
    fn set_reports_enabled_levels() {
        let dir = TempDir::new().expect("temp dir");
        let ctx = context(&dir);
        let mut out = Vec::new();

        SetCommand::new(&ctx)
            .execute(&mut out, &OutputFormat::new(Format::Json), &args("high"))
            .expect("set high");

        let json: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(json["cluster"], "hpc");
        assert_eq!(json["cluster_type"], "HPCServer");
        assert_eq!(json["cluster_level"], 5);
        assert_eq!(json["remote_level_changed"], false);

        let session = SessionFilePort::load(&ctx.locations.parallel_logs_dir()).expect("load");
        assert!(session.signals.retain_job_data);
    }

    #[test]
    fn invalid_level_leaves_no_session() {
        let dir = TempDir::new().expect("temp dir");
        let ctx = context(&dir);
        let mut out = Vec::new();

        let err = SetCommand::new(&ctx)
            .execute(&mut out, &OutputFormat::default(), &args("loud"))
            .unwrap_err();
        assert!(err.to_string().contains("invalid log level 'loud'"));
        assert!(out.is_empty());
        assert!(!ctx.locations.parallel_logs_dir().exists());
    }
}
