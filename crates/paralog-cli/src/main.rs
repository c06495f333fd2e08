//! paralog binary entrypoint.

use std::error::Error as _;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use paralog_cli::cli::{Cli, Commands};
use paralog_cli::commands::{
    Context, EnvCommand, GatherCommand, ProfilesCommand, SetCommand, StatusCommand,
};
use paralog_cli::config::ParalogConfig;
use paralog_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), paralog_cli::CliError> {
    let config = ParalogConfig::load(cli.config.as_deref())?;
    let ctx = Context::new(config);
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Set(args) => {
            let cmd = SetCommand::new(&ctx);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Gather(args) => {
            let cmd = GatherCommand::new(&ctx);
            cmd.execute(&mut stdout, &format, &args)?;
        }
        Commands::Status => {
            let cmd = StatusCommand::new(&ctx);
            cmd.execute(&mut stdout, &format)?;
        }
        Commands::Profiles => {
            let cmd = ProfilesCommand::new(&ctx);
            cmd.execute(&mut stdout, &format)?;
        }
        Commands::Env => {
            let cmd = EnvCommand::new(&ctx);
            cmd.execute(&mut stdout, &format)?;
        }
    }

    Ok(())
}
