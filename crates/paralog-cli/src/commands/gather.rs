//! Gather command implementation.

use std::io::Write;

use paralog_core::{ClusterResolver, CommandRemoteService, GatherOptions, gather_logs};

use crate::cli::GatherArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output::{GatherOutput, OutputFormat};

/// Handler for the gather command.
pub struct GatherCommand<'a> {
    ctx: &'a Context,
}

impl<'a> GatherCommand<'a> {
    /// Creates a new gather command handler.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Executes the gather command.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &GatherArgs,
    ) -> Result<(), CliError> {
        let cluster = self.ctx.config.registry().resolve(args.profile.as_deref())?;

        let options = GatherOptions {
            save_location: args.save_location.clone(),
            additional_files: args.additional.clone(),
            staging_root: self.ctx.config.staging_dir.clone(),
        };
        let mut remote = CommandRemoteService::new(self.ctx.config.mjs.clone());
        let report = gather_logs(&cluster, &options, &self.ctx.locations, &mut remote)?;

        let output = GatherOutput {
            cluster: cluster.label().to_string(),
            report,
        };
        format.write(out, &output)
    }
}
