//! Well-known log locations and lazy directory creation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cluster::ClusterRef;
use crate::error::{ParalogError, Result};

/// Environment variable overriding the preferences root.
pub const PREFS_DIR_ENV: &str = "PARALOG_PREFS_DIR";

/// Directory under the preferences root holding all logging output.
pub const PARALLEL_LOGS_DIR: &str = "ParallelLogs";

/// Client log directory name.
pub const CLIENT_LOGS_DIR: &str = "clientLogs";

/// Native diagnostic log directory name.
pub const NATIVE_LOGS_DIR: &str = "cppLogs";

/// File the native diagnostic sink writes to.
pub const NATIVE_LOG_FILE: &str = "mwlog.txt";

/// Resolves log directories relative to a per-user preferences root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocations {
    prefs_root: PathBuf,
}

impl LogLocations {
    /// Creates a resolver rooted at the given preferences directory.
    #[must_use]
    pub fn new(prefs_root: impl Into<PathBuf>) -> Self {
        Self {
            prefs_root: prefs_root.into(),
        }
    }

    /// Resolves the preferences root from `PARALOG_PREFS_DIR`, an explicit
    /// override, or the platform config directory, in that order.
    #[must_use]
    pub fn discover(configured: Option<&Path>) -> Self {
        let root = std::env::var_os(PREFS_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| configured.map(Path::to_path_buf))
            .or_else(|| dirs::config_dir().map(|d| d.join("paralog")))
            .unwrap_or_else(|| PathBuf::from(".paralog"));
        Self::new(root)
    }

    /// The preferences root.
    #[must_use]
    pub fn prefs_root(&self) -> &Path {
        &self.prefs_root
    }

    /// `<prefs>/ParallelLogs`.
    #[must_use]
    pub fn parallel_logs_dir(&self) -> PathBuf {
        self.prefs_root.join(PARALLEL_LOGS_DIR)
    }

    /// `<prefs>/ParallelLogs/clientLogs`.
    #[must_use]
    pub fn client_log_dir(&self) -> PathBuf {
        self.parallel_logs_dir().join(CLIENT_LOGS_DIR)
    }

    /// `<prefs>/ParallelLogs/cppLogs`, used by the Local cluster only.
    #[must_use]
    pub fn native_log_dir(&self) -> PathBuf {
        self.parallel_logs_dir().join(NATIVE_LOGS_DIR)
    }

    /// `<prefs>/ParallelLogs/cppLogs/mwlog.txt`.
    #[must_use]
    pub fn native_log_file(&self) -> PathBuf {
        self.native_log_dir().join(NATIVE_LOG_FILE)
    }
}

/// Returns the cluster's job storage path for the current platform.
#[must_use]
pub fn job_storage_location(cluster: &ClusterRef) -> Option<&Path> {
    cluster
        .job_storage
        .as_ref()
        .map(|storage| storage.resolve().as_path())
}

/// Creates `path` (and parents) if it does not exist yet.
///
/// Succeeds without touching the filesystem if the directory is already
/// there.
pub fn ensure_log_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    debug!(path = %path.display(), "creating log directory");
    fs::create_dir_all(path).map_err(|source| ParalogError::CouldNotCreateLogDir {
        path: path.to_path_buf(),
        source,
    })?;
    if !path.is_dir() {
        return Err(ParalogError::CouldNotCreateLogDir {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "directory missing after creation",
            ),
        });
    }
    Ok(())
}
