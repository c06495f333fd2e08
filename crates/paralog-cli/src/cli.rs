//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::CONFIG_ENV;

/// paralog - enable verbose cluster logging and gather logs for diagnostics.
#[derive(Parser, Debug, Clone)]
#[command(name = "paralog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON).
    #[arg(short, long, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Enable, change or turn off logging for a cluster and the client.
    Set(SetArgs),

    /// Collect cluster and client logs into a zip archive.
    Gather(GatherArgs),

    /// Show the logging signals currently in effect.
    Status,

    /// List configured cluster profiles.
    Profiles,

    /// Print a shell script exporting the current logging signals.
    Env,
}

/// Arguments for the set command.
#[derive(Parser, Debug, Clone)]
pub struct SetArgs {
    /// Log level: low, medium, high, on, off, custom, or 0-6.
    pub level: String,

    /// Cluster profile (defaults to the configured default profile).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Cluster log level, required with `custom`.
    #[arg(long, value_name = "LEVEL")]
    pub cluster_level: Option<String>,

    /// Client log level, required with `custom`.
    #[arg(long, value_name = "LEVEL")]
    pub client_level: Option<String>,
}

/// Arguments for the gather command.
#[derive(Parser, Debug, Clone)]
pub struct GatherArgs {
    /// Cluster profile (defaults to the configured default profile).
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Directory the archive is written to.
    #[arg(short, long, default_value = ".")]
    pub save_location: PathBuf,

    /// Extra files or folders to include (repeatable).
    #[arg(short, long = "additional", value_name = "PATH")]
    pub additional: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_with_overrides() {
        let cli = Cli::parse_from([
            "paralog",
            "set",
            "custom",
            "--profile",
            "prod",
            "--cluster-level",
            "3",
            "--client-level",
            "low",
        ]);
        match cli.command {
            Commands::Set(args) => {
                assert_eq!(args.level, "custom");
                assert_eq!(args.profile.as_deref(), Some("prod"));
                assert_eq!(args.cluster_level.as_deref(), Some("3"));
                assert_eq!(args.client_level.as_deref(), Some("low"));
            }
            other => panic!("expected set command, got {other:?}"),
        }
    }

    #[test]
    fn gather_defaults_to_current_directory() {
        let cli = Cli::parse_from(["paralog", "gather"]);
        match cli.command {
            Commands::Gather(args) => {
                assert_eq!(args.save_location, PathBuf::from("."));
                assert!(args.additional.is_empty());
            }
            other => panic!("expected gather command, got {other:?}"),
        }
    }

    #[test]
    fn gather_collects_repeated_additional_paths() {
        let cli = Cli::parse_from([
            "paralog", "gather", "-s", "/tmp/out", "-a", "a.log", "-a", "extras",
        ]);
        match cli.command {
            Commands::Gather(args) => {
                assert_eq!(args.save_location, PathBuf::from("/tmp/out"));
                assert_eq!(args.additional, vec![PathBuf::from("a.log"), PathBuf::from("extras")]);
            }
            other => panic!("expected gather command, got {other:?}"),
        }
    }

    #[test]
    fn respects_format_flag() {
        let cli = Cli::parse_from(["paralog", "--format", "json", "status"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn set_requires_level() {
        assert!(Cli::try_parse_from(["paralog", "set"]).is_err());
    }
}
