//! Per-cluster-type enabling and disabling of logging channels.

use tracing::{info, warn};

use crate::cluster::{ClusterRef, ClusterType};
use crate::error::Result;
use crate::level::{LevelPlan, LogLevel, LoggingRequest};
use crate::location::{LogLocations, ensure_log_dir};
use crate::ports::{
    ClientLogging, DebugSignalPort, LOCAL_SCHEDULER_SINK_SPEC, NativeSinkConfig, RemoteLogService,
};

/// Routes logging changes to the channel each cluster type uses.
pub struct ClusterTypeDispatcher<'a, S, R> {
    signals: &'a mut S,
    remote: &'a mut R,
    locations: &'a LogLocations,
}

impl<'a, S, R> ClusterTypeDispatcher<'a, S, R>
where
    S: DebugSignalPort,
    R: RemoteLogService,
{
    /// Creates a dispatcher over the given ports.
    pub fn new(signals: &'a mut S, remote: &'a mut R, locations: &'a LogLocations) -> Self {
        Self {
            signals,
            remote,
            locations,
        }
    }

    /// Applies a validated request: enables at its levels or tears down.
    pub fn set_logging(&mut self, cluster: &ClusterRef, request: &LoggingRequest) -> Result<()> {
        match request.plan() {
            LevelPlan::Enable { cluster: level, client } => self.enable(cluster, level, client),
            LevelPlan::Disable => self.disable(cluster),
        }
    }

    /// Enables cluster-side logging, then client logging.
    pub fn enable(
        &mut self,
        cluster: &ClusterRef,
        cluster_level: LogLevel,
        client_level: LogLevel,
    ) -> Result<()> {
        info!(
            cluster = cluster.label(),
            cluster_type = %cluster.cluster_type,
            %cluster_level,
            %client_level,
            "enabling logging"
        );

        match cluster.cluster_type {
            ClusterType::Local => {
                let native_dir = self.locations.native_log_dir();
                ensure_log_dir(&native_dir)?;
                self.signals.set_debug_signal(true)?;
                self.signals.enable_native_sink(&NativeSinkConfig {
                    spec: LOCAL_SCHEDULER_SINK_SPEC.to_string(),
                    destination: self.locations.native_log_file(),
                })?;
            }
            ClusterType::Mjs | ClusterType::MjsComputeCloud => {
                self.remote.set_cluster_log_level(cluster, cluster_level)?;
                warn!(
                    cluster = cluster.label(),
                    %cluster_level,
                    "remote cluster log level changed; run with level 'off' to reset it"
                );
            }
            ClusterType::HpcServer | ClusterType::Generic => {
                self.signals.set_debug_signal(true)?;
                self.signals.set_job_retention(true)?;
            }
        }

        self.enable_client(client_level)
    }

    /// Disables cluster-side logging, then client logging.
    pub fn disable(&mut self, cluster: &ClusterRef) -> Result<()> {
        info!(
            cluster = cluster.label(),
            cluster_type = %cluster.cluster_type,
            "disabling logging"
        );

        match cluster.cluster_type {
            ClusterType::Local => {
                self.signals.set_debug_signal(false)?;
                self.signals.disable_native_sink()?;
            }
            ClusterType::Mjs | ClusterType::MjsComputeCloud => {
                self.remote.set_cluster_log_level(cluster, LogLevel::OFF)?;
            }
            ClusterType::HpcServer | ClusterType::Generic => {
                self.signals.set_debug_signal(false)?;
                self.signals.set_job_retention(false)?;
            }
        }

        self.signals.disable_client_logging()
    }

    fn enable_client(&mut self, level: LogLevel) -> Result<()> {
        let directory = self.locations.client_log_dir();
        ensure_log_dir(&directory)?;
        self.signals
            .enable_client_logging(&ClientLogging { directory, level })
    }
}
