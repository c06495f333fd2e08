//! CLI error types.

use std::fmt;

use paralog_core::ParalogError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Logging configuration or collection failed.
    Paralog(ParalogError),
    /// Invalid configuration file.
    Config(String),
    /// Output formatting error.
    Format(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paralog(e) => write!(f, "{e}"),
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Format(msg) => write!(f, "format error: {msg}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Paralog(e) => e.source(),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ParalogError> for CliError {
    fn from(err: ParalogError) -> Self {
        Self::Paralog(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn cli_error_display_config() {
        let err = CliError::Config("duplicate profile 'a'".into());
        assert_eq!(err.to_string(), "configuration error: duplicate profile 'a'");
    }

    #[test]
    fn cli_error_passes_through_paralog_message() {
        let err = CliError::from(ParalogError::MissingCustomLogLevel);
        assert_eq!(err.to_string(), ParalogError::MissingCustomLogLevel.to_string());
    }

    #[test]
    fn cli_error_exposes_os_cause() {
        let err = CliError::from(ParalogError::CouldNotCreateLogDir {
            path: PathBuf::from("/x"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("denied"));
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
