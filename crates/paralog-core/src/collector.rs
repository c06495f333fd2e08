//! Log gathering.
//!
//! [`LogCollector::gather`] stages every log location relevant to a cluster
//! into a temporary folder, zips it and moves the archive into the save
//! location:
//!
//! ```text
//! <label>_<timestamp>/
//! ├── jobStorage/       Local, HPCServer, Generic (filtered job storage)
//! ├── cppLogs/          Local only (native diagnostic sink output)
//! ├── cluster/          MJS, MJSComputeCloud (remote retrieval)
//! ├── client/           client logs
//! └── additionalFiles/  caller supplied files and folders
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::archive::{StagingDir, move_file, reserve_archive_path};
use crate::cluster::{ClusterRef, ClusterType};
use crate::error::{ParalogError, Result};
use crate::location::{LogLocations, job_storage_location};
use crate::manifest::{FileManifest, JOB_LOG_EXCLUSIONS};
use crate::ports::RemoteLogService;

/// Staging subfolder for job storage logs.
pub const JOB_STORAGE_SECTION: &str = "jobStorage";
/// Staging subfolder for native diagnostic logs.
pub const NATIVE_SECTION: &str = "cppLogs";
/// Staging subfolder for remotely retrieved cluster logs.
pub const REMOTE_SECTION: &str = "cluster";
/// Staging subfolder for client logs.
pub const CLIENT_SECTION: &str = "client";
/// Staging subfolder for caller supplied files.
pub const ADDITIONAL_SECTION: &str = "additionalFiles";

/// Options for a gather run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherOptions {
    /// Directory the archive is moved into.
    pub save_location: PathBuf,
    /// Extra files or folders to include.
    pub additional_files: Vec<PathBuf>,
    /// Parent of the staging directory; the system temp dir when `None`.
    pub staging_root: Option<PathBuf>,
}

impl Default for GatherOptions {
    fn default() -> Self {
        Self {
            save_location: PathBuf::from("."),
            additional_files: Vec::new(),
            staging_root: None,
        }
    }
}

impl GatherOptions {
    /// Options saving into `save_location`.
    #[must_use]
    pub fn new(save_location: impl Into<PathBuf>) -> Self {
        Self {
            save_location: save_location.into(),
            ..Default::default()
        }
    }

    /// Adds an extra file or folder.
    #[must_use]
    pub fn with_additional(mut self, path: impl Into<PathBuf>) -> Self {
        self.additional_files.push(path.into());
        self
    }

    /// Stages under `root` instead of the system temp dir.
    #[must_use]
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }
}

/// Outcome of a gather run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatherReport {
    /// Final archive location.
    pub archive: PathBuf,
    /// Files copied from job storage.
    pub job_storage_files: usize,
    /// Files copied from the native log directory.
    pub native_files: usize,
    /// Files retrieved from the remote cluster.
    pub remote_files: usize,
    /// Files copied from the client log directory.
    pub client_files: usize,
    /// Caller supplied files copied.
    pub additional_files: usize,
}

impl GatherReport {
    /// Total number of files in the archive.
    #[must_use]
    pub const fn total_files(&self) -> usize {
        self.job_storage_files
            + self.native_files
            + self.remote_files
            + self.client_files
            + self.additional_files
    }
}

/// Gathers cluster and client logs into a zip archive.
pub struct LogCollector<'a, R> {
    locations: &'a LogLocations,
    remote: &'a mut R,
}

impl<'a, R: RemoteLogService> LogCollector<'a, R> {
    /// Creates a collector.
    pub fn new(locations: &'a LogLocations, remote: &'a mut R) -> Self {
        Self { locations, remote }
    }

    /// Stages, archives and moves logs for `cluster`.
    ///
    /// The staging directory is removed on every exit path.
    pub fn gather(&mut self, cluster: &ClusterRef, options: &GatherOptions) -> Result<GatherReport> {
        check_save_location(&options.save_location)?;
        for extra in &options.additional_files {
            if !extra.exists() {
                return Err(ParalogError::AdditionalFileNotFound(extra.clone()));
            }
        }

        let staging_parent = options
            .staging_root
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        let staging = StagingDir::create(&staging_parent, cluster.label(), Utc::now())?;
        let root = staging.root();
        info!(
            cluster = cluster.label(),
            cluster_type = %cluster.cluster_type,
            staging = %staging.path().display(),
            "gathering logs"
        );

        let mut report = GatherReport::default();

        if cluster.cluster_type.uses_job_storage() {
            report.job_storage_files = self.copy_job_storage(cluster, &root)?;
        }
        match cluster.cluster_type {
            ClusterType::Local => {
                report.native_files = FileManifest::discover(self.locations.native_log_dir())?
                    .copy_into(&root.join(NATIVE_SECTION))?;
            }
            ClusterType::HpcServer | ClusterType::Generic => {}
            ClusterType::Mjs | ClusterType::MjsComputeCloud => {
                let target = root.join(REMOTE_SECTION);
                fs::create_dir_all(&target)?;
                info!(cluster = cluster.label(), "retrieving remote cluster logs; this can take several minutes");
                self.remote.retrieve_logs(cluster, &target)?;
                report.remote_files = FileManifest::discover(&target)?.len();
            }
        }

        report.client_files = FileManifest::discover(self.locations.client_log_dir())?
            .copy_into(&root.join(CLIENT_SECTION))?;

        for extra in &options.additional_files {
            report.additional_files +=
                additional_manifest(extra)?.copy_into(&root.join(ADDITIONAL_SECTION))?;
        }

        let zip_path = staging.archive()?;
        let destination = reserve_archive_path(&options.save_location, staging.name())?;
        if let Err(e) = move_file(&zip_path, &destination) {
            // Drop the empty placeholder so a failed gather leaves nothing behind.
            if let Err(cleanup) = fs::remove_file(&destination) {
                debug!(path = %destination.display(), error = %cleanup, "could not remove archive placeholder");
            }
            return Err(e);
        }
        report.archive = destination;

        info!(
            archive = %report.archive.display(),
            files = report.total_files(),
            "logs gathered"
        );
        Ok(report)
    }

    fn copy_job_storage(&self, cluster: &ClusterRef, root: &Path) -> Result<usize> {
        let Some(storage) = job_storage_location(cluster) else {
            warn!(cluster = cluster.label(), "cluster has no job storage location");
            return Ok(0);
        };
        if !storage.is_dir() {
            warn!(path = %storage.display(), "job storage location does not exist");
            return Ok(0);
        }
        FileManifest::discover(storage)?
            .exclude(&JOB_LOG_EXCLUSIONS)
            .copy_into(&root.join(JOB_STORAGE_SECTION))
    }
}

/// Folders keep their own name in the archive; a bare file is a single entry.
fn additional_manifest(path: &Path) -> Result<FileManifest> {
    if path.is_dir() {
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(FileManifest::discover(path)?.with_base(parent))
    } else {
        Ok(FileManifest::single_file(path))
    }
}

/// Fails unless `path` is an existing, writable directory.
pub fn check_save_location(path: &Path) -> Result<()> {
    let read_only = || ParalogError::SaveLocationReadOnly(path.to_path_buf());
    let metadata = fs::metadata(path).map_err(|_| read_only())?;
    if !metadata.is_dir() || metadata.permissions().readonly() {
        return Err(read_only());
    }
    tempfile::tempfile_in(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "save location probe failed");
        read_only()
    })?;
    Ok(())
}
