//! Env command implementation.
//!
//! Prints the script `paralog set` keeps in `ParallelLogs/session.env`, so a
//! shell can apply the signals with `eval "$(paralog env)"`.

use std::io::Write;

use paralog_core::SessionFilePort;

use crate::commands::Context;
use crate::error::CliError;
use crate::output::{EnvOutput, OutputFormat};

/// Handler for the env command.
pub struct EnvCommand<'a> {
    ctx: &'a Context,
}

impl<'a> EnvCommand<'a> {
    /// Creates a new env command handler.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Executes the env command.
    pub fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let port = SessionFilePort::open(
            self.ctx.locations.parallel_logs_dir(),
            self.ctx.config.signals.clone(),
        )?;
        let output = EnvOutput {
            path: port.env_script_path(),
            script: port.env_script(),
        };
        format.write(out, &output)
    }
}
