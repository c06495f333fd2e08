//! # paralog-core
//!
//! Verbose logging configuration and log collection for compute clusters.
//!
//! This crate provides:
//!
//! - [`LogLevel`], [`LevelArg`], [`LoggingRequest`] - Level validation and
//!   normalization
//! - [`ClusterTypeDispatcher`] - Enables/disables the logging channel each
//!   [`ClusterType`] uses
//! - [`LogLocations`] - Client, native and job storage log locations
//! - [`LogCollector`] - Stages and zips logs for diagnostics
//! - [`DebugSignalPort`], [`RemoteLogService`], [`ClusterResolver`] - Seams
//!   around process-wide and remote state
//!
//! ## Example
//!
//! ```rust
//! use paralog_core::{
//!     ClusterRef, ClusterType, LogLocations, LoggingRequest, MemorySignalPort,
//!     CommandRemoteService, set_logging,
//! };
//!
//! # fn main() -> paralog_core::Result<()> {
//! let prefs = std::env::temp_dir().join("paralog-doc");
//! let locations = LogLocations::new(&prefs);
//! let mut signals = MemorySignalPort::new();
//! let mut remote = CommandRemoteService::default();
//!
//! let request = LoggingRequest::parse("medium", None, None)?;
//! let cluster = ClusterRef::new(ClusterType::Generic);
//! set_logging(&cluster, &request, &locations, &mut signals, &mut remote)?;
//!
//! assert!(signals.state().retain_job_data);
//! # std::fs::remove_dir_all(&prefs)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod cluster;
pub mod collector;
pub mod dispatch;
pub mod error;
pub mod level;
pub mod location;
pub mod manifest;
pub mod ports;
pub mod profile;
pub mod remote;
pub mod session;

pub use archive::{StagingDir, move_file, reserve_archive_path, zip_directory};
pub use cluster::{ClusterRef, ClusterType, JobStorage};
pub use collector::{GatherOptions, GatherReport, LogCollector, check_save_location};
pub use dispatch::ClusterTypeDispatcher;
pub use error::{ParalogError, Result};
pub use level::{LevelArg, LevelPlan, LogLevel, LoggingRequest, normalize};
pub use location::{LogLocations, ensure_log_dir, job_storage_location};
pub use manifest::{FileManifest, JOB_LOG_EXCLUSIONS, relative_path};
pub use ports::{
    ClientLogging, ClusterResolver, DebugSignalPort, MemorySignalPort, NativeSinkConfig,
    RemoteLogService, SignalState,
};
pub use profile::{ClusterProfile, ProfileRegistry};
pub use remote::{CommandRemoteService, MjsCommands};
pub use session::{SessionFilePort, SessionRecord, SignalNames};

/// Applies a validated `request` to `cluster`.
///
/// `request` was validated when it was built, so failures here come from the
/// ports or from creating log directories.
pub fn set_logging<S, R>(
    cluster: &ClusterRef,
    request: &LoggingRequest,
    locations: &LogLocations,
    signals: &mut S,
    remote: &mut R,
) -> Result<()>
where
    S: DebugSignalPort,
    R: RemoteLogService,
{
    ClusterTypeDispatcher::new(signals, remote, locations).set_logging(cluster, request)
}

/// Gathers logs for `cluster` into a zip archive in `options.save_location`.
pub fn gather_logs<R: RemoteLogService>(
    cluster: &ClusterRef,
    options: &GatherOptions,
    locations: &LogLocations,
    remote: &mut R,
) -> Result<GatherReport> {
    LogCollector::new(locations, remote).gather(cluster, options)
}
