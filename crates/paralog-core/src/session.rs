//! Persisted process-wide logging signals.
//!
//! [`SessionFilePort`] is the [`DebugSignalPort`] used by the command-line
//! tool. Signals outlive the process, so they are written to
//! `<dir>/session.json` together with a `session.env` script that exports them
//! for the scheduler wrappers and client sessions launched afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::location::ensure_log_dir;
use crate::ports::{ClientLogging, DebugSignalPort, NativeSinkConfig, SignalState};

/// File name of the JSON session state.
pub const SESSION_STATE_FILE: &str = "session.json";

/// File name of the sourceable environment script.
pub const SESSION_ENV_FILE: &str = "session.env";

/// Environment variable names exported for each signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalNames {
    /// Shared debug signal.
    pub debug: String,
    /// Job retention toggle.
    pub retain_job_data: String,
    /// Native diagnostic sink component spec.
    pub native_spec: String,
    /// Native diagnostic sink destination file.
    pub native_destination: String,
    /// Client log directory.
    pub client_log_dir: String,
    /// Client log level.
    pub client_log_level: String,
}

impl Default for SignalNames {
    fn default() -> Self {
        Self {
            debug: "PARALLEL_SERVER_DEBUG".to_string(),
            retain_job_data: "PARALLEL_SERVER_RETAIN_JOB_DATA".to_string(),
            native_spec: "PARALOG_NATIVE_LOG_SPEC".to_string(),
            native_destination: "PARALOG_NATIVE_LOG_FILE".to_string(),
            client_log_dir: "PARALOG_CLIENT_LOG_DIR".to_string(),
            client_log_level: "PARALOG_CLIENT_LOG_LEVEL".to_string(),
        }
    }
}

/// On-disk session record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Current signals.
    #[serde(flatten)]
    pub signals: SignalState,
    /// Last time any signal changed.
    pub updated_at: Option<DateTime<Utc>>,
}

/// [`DebugSignalPort`] backed by a session directory.
#[derive(Debug)]
pub struct SessionFilePort {
    dir: PathBuf,
    names: SignalNames,
    record: SessionRecord,
}

impl SessionFilePort {
    /// Opens the session stored in `dir`, starting empty if none exists.
    pub fn open(dir: impl Into<PathBuf>, names: SignalNames) -> Result<Self> {
        let dir = dir.into();
        let record = Self::load(&dir)?;
        Ok(Self { dir, names, record })
    }

    /// Reads the session record in `dir` without opening it for writing.
    pub fn load(dir: &Path) -> Result<SessionRecord> {
        let path = dir.join(SESSION_STATE_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of the environment script.
    #[must_use]
    pub fn env_script_path(&self) -> PathBuf {
        self.dir.join(SESSION_ENV_FILE)
    }

    /// Renders the environment script for the current state.
    #[must_use]
    pub fn env_script(&self) -> String {
        render_env_script(&self.record.signals, &self.names)
    }

    fn update(&mut self, change: impl FnOnce(&mut SignalState)) -> Result<()> {
        change(&mut self.record.signals);
        self.record.updated_at = Some(Utc::now());
        self.save()
    }

    fn save(&self) -> Result<()> {
        ensure_log_dir(&self.dir)?;
        let json = serde_json::to_string_pretty(&self.record)?;
        fs::write(self.dir.join(SESSION_STATE_FILE), json)?;
        fs::write(self.env_script_path(), self.env_script())?;
        debug!(dir = %self.dir.display(), "saved logging session");
        Ok(())
    }
}

impl DebugSignalPort for SessionFilePort {
    fn set_debug_signal(&mut self, enabled: bool) -> Result<()> {
        self.update(|s| s.debug = enabled)
    }

    fn set_job_retention(&mut self, retain: bool) -> Result<()> {
        self.update(|s| s.retain_job_data = retain)
    }

    fn enable_native_sink(&mut self, sink: &NativeSinkConfig) -> Result<()> {
        self.update(|s| s.native_sink = Some(sink.clone()))
    }

    fn disable_native_sink(&mut self) -> Result<()> {
        self.update(|s| s.native_sink = None)
    }

    fn enable_client_logging(&mut self, logging: &ClientLogging) -> Result<()> {
        self.update(|s| s.client_logging = Some(logging.clone()))
    }

    fn disable_client_logging(&mut self) -> Result<()> {
        self.update(|s| s.client_logging = None)
    }
}

/// Renders a POSIX shell script exporting (or unsetting) every signal.
#[must_use]
pub fn render_env_script(state: &SignalState, names: &SignalNames) -> String {
    let mut lines = vec!["# Generated by paralog. Source this file to apply logging signals.".to_string()];

    let mut flag = |name: &str, on: bool| {
        if on {
            lines.push(format!("export {name}=true"));
        } else {
            lines.push(format!("unset {name}"));
        }
    };
    flag(&names.debug, state.debug);
    flag(&names.retain_job_data, state.retain_job_data);

    match &state.native_sink {
        Some(sink) => {
            lines.push(format!("export {}={}", names.native_spec, shell_quote(&sink.spec)));
            lines.push(format!(
                "export {}={}",
                names.native_destination,
                shell_quote(&sink.destination.to_string_lossy())
            ));
        }
        None => {
            lines.push(format!("unset {}", names.native_spec));
            lines.push(format!("unset {}", names.native_destination));
        }
    }

    match &state.client_logging {
        Some(client) => {
            lines.push(format!(
                "export {}={}",
                names.client_log_dir,
                shell_quote(&client.directory.to_string_lossy())
            ));
            lines.push(format!("export {}={}", names.client_log_level, client.level));
        }
        None => {
            lines.push(format!("unset {}", names.client_log_dir));
            lines.push(format!("unset {}", names.client_log_level));
        }
    }

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use crate::ports::LOCAL_SCHEDULER_SINK_SPEC;

    #[test]
    fn session_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session_dir = dir.path().join("ParallelLogs");
        {
            let mut port =
                SessionFilePort::open(&session_dir, SignalNames::default()).expect("open");
            port.set_debug_signal(true).expect("debug");
            port.enable_client_logging(&ClientLogging {
                directory: PathBuf::from("/logs/client"),
                level: LogLevel::MEDIUM,
            })
            .expect("client");
        }

        let record = SessionFilePort::load(&session_dir).expect("load");
        assert!(record.signals.debug);
        assert_eq!(
            record.signals.client_logging.map(|c| c.level),
            Some(LogLevel::MEDIUM)
        );
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn missing_session_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let record = SessionFilePort::load(dir.path()).expect("load");
        assert_eq!(record, SessionRecord::default());
    }

    #[test]
    fn env_script_exports_enabled_signals() {
        let state = SignalState {
            debug: true,
            retain_job_data: false,
            native_sink: Some(NativeSinkConfig {
                spec: LOCAL_SCHEDULER_SINK_SPEC.to_string(),
                destination: PathBuf::from("/p/ParallelLogs/cppLogs/mwlog.txt"),
            }),
            client_logging: None,
        };
        let script = render_env_script(&state, &SignalNames::default());

        assert!(script.contains("export PARALLEL_SERVER_DEBUG=true\n"));
        assert!(script.contains("unset PARALLEL_SERVER_RETAIN_JOB_DATA\n"));
        assert!(script.contains("export PARALOG_NATIVE_LOG_SPEC='parallel::localscheduler.*=all'\n"));
        assert!(script.contains("unset PARALOG_CLIENT_LOG_DIR\n"));
    }

    #[test]
    fn env_script_written_on_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut port = SessionFilePort::open(dir.path(), SignalNames::default()).expect("open");
        port.set_job_retention(true).expect("retention");

        let script = fs::read_to_string(port.env_script_path()).expect("script");
        assert!(script.contains("export PARALLEL_SERVER_RETAIN_JOB_DATA=true"));
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
