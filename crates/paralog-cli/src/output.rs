//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use paralog_core::{ClusterProfile, GatherReport, LogLevel, SessionRecord};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Result of the set command.
#[derive(Debug, Clone, Serialize)]
pub struct SetOutput {
    /// Profile name or type tag.
    pub cluster: String,
    /// Cluster type tag.
    pub cluster_type: String,
    /// `enabled` or `disabled`.
    pub action: &'static str,
    /// Cluster-side level when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_level: Option<LogLevel>,
    /// Client level when enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_level: Option<LogLevel>,
    /// Client log directory.
    pub client_log_dir: PathBuf,
    /// Environment script to source.
    pub env_script: PathBuf,
    /// Whether a remote level was written that must be reset manually.
    pub remote_level_changed: bool,
}

impl TableDisplay for SetOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Logging {} for {} ({})", self.action, self.cluster, self.cluster_type)?;
        writeln!(writer, "══════════════════════════════════")?;
        if let Some(level) = self.cluster_level {
            writeln!(writer, "Cluster Level:    {level}")?;
        }
        if let Some(level) = self.client_level {
            writeln!(writer, "Client Level:     {level}")?;
        }
        writeln!(writer, "Client Logs:      {}", self.client_log_dir.display())?;
        writeln!(writer, "Environment:      {}", self.env_script.display())?;
        if self.remote_level_changed {
            writeln!(writer)?;
            writeln!(
                writer,
                "The remote cluster log level was changed. Run `paralog set off` to reset it."
            )?;
        }
        Ok(())
    }
}

/// Result of the gather command.
#[derive(Debug, Clone, Serialize)]
pub struct GatherOutput {
    /// Profile name or type tag.
    pub cluster: String,
    /// Counts and archive path.
    #[serde(flatten)]
    pub report: GatherReport,
}

impl TableDisplay for GatherOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let r = &self.report;
        writeln!(writer, "Logs gathered for {}", self.cluster)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Archive:          {}", r.archive.display())?;
        writeln!(writer)?;
        writeln!(writer, "Files")?;
        writeln!(writer, "  Job storage:    {}", r.job_storage_files)?;
        writeln!(writer, "  Native logs:    {}", r.native_files)?;
        writeln!(writer, "  Remote logs:    {}", r.remote_files)?;
        writeln!(writer, "  Client logs:    {}", r.client_files)?;
        writeln!(writer, "  Additional:     {}", r.additional_files)?;
        writeln!(writer, "  Total:          {}", r.total_files())?;
        Ok(())
    }
}

/// Current session state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    /// Preferences root.
    pub prefs_dir: PathBuf,
    /// Persisted signals.
    #[serde(flatten)]
    pub session: SessionRecord,
}

impl TableDisplay for StatusOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let s = &self.session.signals;
        writeln!(writer, "Logging Status")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Preferences:      {}", self.prefs_dir.display())?;
        writeln!(writer, "Debug Signal:     {}", on_off(s.debug))?;
        writeln!(writer, "Job Retention:    {}", on_off(s.retain_job_data))?;
        match &s.native_sink {
            Some(sink) => {
                writeln!(writer, "Native Sink:      {}", sink.spec)?;
                writeln!(writer, "  Destination:    {}", sink.destination.display())?;
            }
            None => writeln!(writer, "Native Sink:      off")?,
        }
        match &s.client_logging {
            Some(client) => {
                writeln!(writer, "Client Logging:   level {}", client.level)?;
                writeln!(writer, "  Directory:      {}", client.directory.display())?;
            }
            None => writeln!(writer, "Client Logging:   off")?,
        }
        if let Some(updated) = self.session.updated_at {
            writeln!(writer, "Updated:          {}", updated.to_rfc3339())?;
        }
        Ok(())
    }
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Configured profiles.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileList {
    /// Default profile name.
    pub default_profile: Option<String>,
    /// Profiles in configuration order.
    pub profiles: Vec<ClusterProfile>,
}

impl TableDisplay for ProfileList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.profiles.is_empty() {
            writeln!(writer, "No cluster profiles configured")?;
            return Ok(());
        }

        writeln!(writer, "{:<2}{:<24}  {:<16}  {}", "", "NAME", "TYPE", "JOB STORAGE")?;
        writeln!(writer, "{}", "─".repeat(72))?;
        for profile in &self.profiles {
            let marker = if self.default_profile.as_deref() == Some(profile.name.as_str()) {
                "*"
            } else {
                ""
            };
            let storage = profile
                .job_storage
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| s.resolve().display().to_string());
            writeln!(
                writer,
                "{:<2}{:<24}  {:<16}  {}",
                marker,
                truncate(&profile.name, 24),
                profile.type_tag,
                storage
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} profile(s)", self.profiles.len())?;
        Ok(())
    }
}

/// Environment script for the current session.
#[derive(Debug, Clone, Serialize)]
pub struct EnvOutput {
    /// Where the script is kept on disk.
    pub path: PathBuf,
    /// Script contents.
    pub script: String,
}

impl TableDisplay for EnvOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        write!(writer, "{}", self.script)?;
        Ok(())
    }
}

/// Truncate a string to max length, adding "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let mut out: String = s.chars().take(max_len - 3).collect();
        out.push_str("...");
        out
    }
}
