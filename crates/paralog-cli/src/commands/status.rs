//! Status command implementation.

use std::io::Write;

use paralog_core::SessionFilePort;

use crate::commands::Context;
use crate::error::CliError;
use crate::output::{OutputFormat, StatusOutput};

/// Handler for the status command.
pub struct StatusCommand<'a> {
    ctx: &'a Context,
}

impl<'a> StatusCommand<'a> {
    /// Creates a new status command handler.
    #[must_use]
    pub const fn new(ctx: &'a Context) -> Self {
        Self { ctx }
    }

    /// Executes the status command.
    pub fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let session = SessionFilePort::load(&self.ctx.locations.parallel_logs_dir())?;
        let output = StatusOutput {
            prefs_dir: self.ctx.locations.prefs_root().to_path_buf(),
            session,
        };
        format.write(out, &output)
    }
}
