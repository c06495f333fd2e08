//! Traits for the collaborators that own process-wide or remote state.
//!
//! This module provides:
//! - [`DebugSignalPort`] - environment signals, the native diagnostic sink
//!   and client logging
//! - [`RemoteLogService`] - remote log level property and log retrieval for
//!   MJS clusters
//! - [`ClusterResolver`] - turns a profile name into a [`ClusterRef`]
//! - [`MemorySignalPort`] - in-process implementation of [`DebugSignalPort`]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterRef;
use crate::error::Result;
use crate::level::LogLevel;

/// Spec selecting which native components log, for the Local cluster.
pub const LOCAL_SCHEDULER_SINK_SPEC: &str = "parallel::localscheduler.*=all";

/// Destination and component spec for the native diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeSinkConfig {
    /// Component selection spec.
    pub spec: String,
    /// File the sink writes to.
    pub destination: PathBuf,
}

/// Client logging destination and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLogging {
    /// Directory client logs are written to.
    pub directory: PathBuf,
    /// Client verbosity.
    pub level: LogLevel,
}

/// Process-wide logging state.
///
/// Callers must serialize enable/disable calls against the same port.
pub trait DebugSignalPort {
    /// Sets or clears the shared debug signal.
    fn set_debug_signal(&mut self, enabled: bool) -> Result<()>;

    /// Forces the scheduler to keep job data after completion, or restores
    /// the default retention behavior.
    fn set_job_retention(&mut self, retain: bool) -> Result<()>;

    /// Points the native diagnostic sink at a destination.
    fn enable_native_sink(&mut self, sink: &NativeSinkConfig) -> Result<()>;

    /// Turns the native diagnostic sink off.
    fn disable_native_sink(&mut self) -> Result<()>;

    /// Turns client logging on.
    fn enable_client_logging(&mut self, logging: &ClientLogging) -> Result<()>;

    /// Turns client logging off.
    fn disable_client_logging(&mut self) -> Result<()>;
}

/// Remote operations against an MJS cluster.
pub trait RemoteLogService {
    /// Writes the cluster's remote log level property.
    ///
    /// There is no local rollback; callers reset the level by writing 0.
    fn set_cluster_log_level(&mut self, cluster: &ClusterRef, level: LogLevel) -> Result<()>;

    /// Copies the cluster's logs into `destination`. Blocks until done.
    fn retrieve_logs(&mut self, cluster: &ClusterRef, destination: &Path) -> Result<()>;
}

/// Resolves a profile name (or the default profile) into a cluster.
pub trait ClusterResolver {
    /// Resolves `profile`, falling back to the default profile on `None`.
    fn resolve(&self, profile: Option<&str>) -> Result<ClusterRef>;
}

/// Snapshot of every signal a [`DebugSignalPort`] controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    /// Shared debug signal.
    pub debug: bool,
    /// Job retention forced on.
    pub retain_job_data: bool,
    /// Native diagnostic sink, when enabled.
    pub native_sink: Option<NativeSinkConfig>,
    /// Client logging, when enabled.
    pub client_logging: Option<ClientLogging>,
}

/// [`DebugSignalPort`] that keeps state in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySignalPort {
    state: SignalState,
    calls: usize,
}

impl MemorySignalPort {
    /// Creates a port with every signal off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SignalState {
        &self.state
    }

    /// Number of mutating calls made so far.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }
}

impl DebugSignalPort for MemorySignalPort {
    fn set_debug_signal(&mut self, enabled: bool) -> Result<()> {
        self.calls += 1;
        self.state.debug = enabled;
        Ok(())
    }

    fn set_job_retention(&mut self, retain: bool) -> Result<()> {
        self.calls += 1;
        self.state.retain_job_data = retain;
        Ok(())
    }

    fn enable_native_sink(&mut self, sink: &NativeSinkConfig) -> Result<()> {
        self.calls += 1;
        self.state.native_sink = Some(sink.clone());
        Ok(())
    }

    fn disable_native_sink(&mut self) -> Result<()> {
        self.calls += 1;
        self.state.native_sink = None;
        Ok(())
    }

    fn enable_client_logging(&mut self, logging: &ClientLogging) -> Result<()> {
        self.calls += 1;
        self.state.client_logging = Some(logging.clone());
        Ok(())
    }

    fn disable_client_logging(&mut self) -> Result<()> {
        self.calls += 1;
        self.state.client_logging = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_port_tracks_state() {
        let mut port = MemorySignalPort::new();
        assert_eq!(port.state(), &SignalState::default());

        port.set_debug_signal(true).expect("debug");
        port.set_job_retention(true).expect("retention");
        port.enable_native_sink(&NativeSinkConfig {
            spec: LOCAL_SCHEDULER_SINK_SPEC.to_string(),
            destination: PathBuf::from("/tmp/mwlog.txt"),
        })
        .expect("sink");

        assert!(port.state().debug);
        assert!(port.state().retain_job_data);
        assert!(port.state().native_sink.is_some());
        assert_eq!(port.calls(), 3);

        port.disable_native_sink().expect("sink off");
        assert!(port.state().native_sink.is_none());
    }
}
