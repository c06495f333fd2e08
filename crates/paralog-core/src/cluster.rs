//! Cluster model: type tags, job storage and cluster references.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParalogError, Result};

/// Profile type tag for thread-based pools, which have no logging channels.
pub const THREADS_PROFILE_TYPE: &str = "Threads";

/// Kind of execution backend behind a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClusterType {
    /// Local worker processes on this machine.
    Local,
    /// Remote job scheduler service.
    Mjs,
    /// Remote job scheduler service hosted in the cloud.
    MjsComputeCloud,
    /// Windows HPC Server scheduler integration.
    HpcServer,
    /// Generic third-party scheduler integration.
    Generic,
}

impl ClusterType {
    /// All supported cluster types.
    pub const ALL: [Self; 5] = [
        Self::Local,
        Self::Mjs,
        Self::MjsComputeCloud,
        Self::HpcServer,
        Self::Generic,
    ];

    /// Returns the canonical type tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Mjs => "MJS",
            Self::MjsComputeCloud => "MJSComputeCloud",
            Self::HpcServer => "HPCServer",
            Self::Generic => "Generic",
        }
    }

    /// Returns true for the remote job scheduler service types.
    #[must_use]
    pub const fn is_mjs(&self) -> bool {
        matches!(self, Self::Mjs | Self::MjsComputeCloud)
    }

    /// Returns true if logs for this type live under a job storage location.
    #[must_use]
    pub const fn uses_job_storage(&self) -> bool {
        !self.is_mjs()
    }
}

impl FromStr for ClusterType {
    type Err = ParalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParalogError::InvalidClusterType(s.to_string()))
    }
}

impl TryFrom<String> for ClusterType {
    type Error = ParalogError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ClusterType> for String {
    fn from(value: ClusterType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a cluster persists job and task artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobStorage {
    /// A single path valid on every platform.
    Path(PathBuf),
    /// Distinct paths for Windows and Unix clients.
    PerPlatform {
        /// Path used on Windows.
        windows: PathBuf,
        /// Path used everywhere else.
        unix: PathBuf,
    },
}

impl JobStorage {
    /// Selects the path for the current platform.
    #[must_use]
    pub fn resolve(&self) -> &PathBuf {
        match self {
            Self::Path(path) => path,
            Self::PerPlatform { windows, unix } => {
                if cfg!(windows) {
                    windows
                } else {
                    unix
                }
            }
        }
    }
}

/// A resolved cluster handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterRef {
    /// Backend kind.
    pub cluster_type: ClusterType,
    /// Profile the cluster was resolved from, if any.
    pub profile: Option<String>,
    /// Job storage location, if the cluster has one.
    pub job_storage: Option<JobStorage>,
}

impl ClusterRef {
    /// Creates a cluster reference with no profile or job storage.
    #[must_use]
    pub const fn new(cluster_type: ClusterType) -> Self {
        Self {
            cluster_type,
            profile: None,
            job_storage: None,
        }
    }

    /// Sets the profile name.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Sets the job storage location.
    #[must_use]
    pub fn with_job_storage(mut self, storage: JobStorage) -> Self {
        self.job_storage = Some(storage);
        self
    }

    /// Profile name, or the type tag when there is no profile.
    #[must_use]
    pub fn label(&self) -> &str {
        self.profile
            .as_deref()
            .unwrap_or_else(|| self.cluster_type.as_str())
    }
}
