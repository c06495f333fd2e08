//! # paralog-cli
//!
//! Command-line interface for paralog.
//!
//! Provides commands for:
//! - Enabling, changing and disabling verbose logging per cluster profile
//! - Gathering logs into a zip archive for diagnostics
//! - Inspecting the persisted logging signals
//!
//! # Architecture
//!
//! Process-wide signals are persisted under `ParallelLogs/` in the
//! preferences root, so a later `paralog env` (or `source session.env`) can
//! apply them to the shell that launches cluster jobs.
//!
//! ```text
//! ┌──────────────┐   set / gather   ┌──────────────┐   commands   ┌─────────┐
//! │  paralog-cli │─────────────────►│ paralog-core │─────────────►│   MJS   │
//! └──────────────┘                  └──────────────┘              └─────────┘
//!                                          │
//!                                          ▼
//!                               ParallelLogs/session.{json,env}
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, GatherArgs, SetArgs};
pub use commands::Context;
pub use config::ParalogConfig;
pub use error::CliError;
pub use output::OutputFormat;
