//! Error types for logging configuration and log collection.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring cluster logging or gathering logs.
#[derive(Debug, Error)]
pub enum ParalogError {
    /// A level token or integer was not recognized.
    #[error("invalid log level '{0}': expected low, medium, high, on, off, custom or an integer 0-6")]
    InvalidLogLevel(String),

    /// The `custom` level was requested without both overrides.
    #[error("log level 'custom' requires both a cluster log level and a client log level")]
    MissingCustomLogLevel,

    /// An override was supplied without the `custom` level.
    #[error("cluster and client log levels can only be supplied with log level 'custom', got '{0}'")]
    InvalidLevelCombination(String),

    /// The cluster type tag is not one this tool handles.
    #[error("invalid cluster type '{0}': expected Local, MJS, MJSComputeCloud, HPCServer or Generic")]
    InvalidClusterType(String),

    /// The profile refers to a kind of pool that has no logging channels.
    #[error("profile '{profile}' is a {kind} profile; logging can only be set for cluster profiles")]
    ProfileKindNotSupported {
        /// Profile name.
        profile: String,
        /// The disallowed kind.
        kind: String,
    },

    /// No profile with the given name is configured.
    #[error("cluster profile not found: {0}")]
    ProfileNotFound(String),

    /// No profile was given and no default profile is configured.
    #[error("no cluster profile given and no default profile configured")]
    NoDefaultProfile,

    /// The archive destination does not exist or cannot be written.
    #[error("save location '{}' does not exist or is not writable", .0.display())]
    SaveLocationReadOnly(PathBuf),

    /// A requested additional file or folder does not exist.
    #[error("additional file or folder not found: {}", .0.display())]
    AdditionalFileNotFound(PathBuf),

    /// A log directory could not be created.
    #[error("could not create log directory '{}'", path.display())]
    CouldNotCreateLogDir {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// No remote command is configured for an MJS operation.
    #[error("remote operation '{0}' is not configured")]
    RemoteUnavailable(&'static str),

    /// A remote command ran but did not succeed.
    #[error("remote command '{command}' failed: {detail}")]
    RemoteCommandFailed {
        /// Program that was run.
        command: String,
        /// Exit status and stderr summary.
        detail: String,
    },

    /// Writing the zip archive failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for paralog operations.
pub type Result<T> = std::result::Result<T, ParalogError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn error_display_messages() {
        let err = ParalogError::InvalidLogLevel("loud".to_string());
        assert!(err.to_string().starts_with("invalid log level 'loud'"));

        let err = ParalogError::InvalidClusterType("Cloud".to_string());
        assert!(err.to_string().contains("'Cloud'"));

        let err = ParalogError::ProfileNotFound("prod".to_string());
        assert_eq!(err.to_string(), "cluster profile not found: prod");

        let err = ParalogError::SaveLocationReadOnly(PathBuf::from("/ro"));
        assert_eq!(
            err.to_string(),
            "save location '/ro' does not exist or is not writable"
        );
    }

    #[test]
    fn could_not_create_log_dir_exposes_cause() {
        let err = ParalogError::CouldNotCreateLogDir {
            path: PathBuf::from("/nope/logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "could not create log directory '/nope/logs'");
        let cause = err.source().map(ToString::to_string);
        assert_eq!(cause.as_deref(), Some("denied"));
    }

    #[test]
    fn profile_kind_message_names_profile() {
        let err = ParalogError::ProfileKindNotSupported {
            profile: "threads".to_string(),
            kind: "Threads".to_string(),
        };
        assert!(err.to_string().contains("'threads' is a Threads profile"));
    }

    #[test]
    fn error_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ParalogError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParalogError>();
    }
}
