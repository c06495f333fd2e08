//! Log level policy.
//!
//! This module provides:
//! - [`LogLevel`] - Numeric verbosity 0–6
//! - [`LevelArg`] - A parsed level token (`low`, `medium`, `high`, `on`, `off`,
//!   `custom` or an integer)
//! - [`LoggingRequest`] - A validated level plus optional overrides
//! - [`LevelPlan`] - What the dispatcher should do with a request

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParalogError, Result};

/// Numeric log level, always within `0..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LogLevel(u8);

impl LogLevel {
    /// Logging turned off.
    pub const OFF: Self = Self(0);
    /// The `low` tier.
    pub const LOW: Self = Self(2);
    /// The `medium` tier.
    pub const MEDIUM: Self = Self(4);
    /// The `high` tier (also `on`).
    pub const HIGH: Self = Self(5);
    /// Most verbose level accepted.
    pub const MAX: Self = Self(6);

    /// Creates a level from an integer, rejecting values above 6.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX.0 {
            return Err(ParalogError::InvalidLogLevel(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = ParalogError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A level argument as given by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelArg {
    /// `low` (2).
    Low,
    /// `medium` (4).
    Medium,
    /// `high` (5).
    High,
    /// `on`, a synonym for `high`.
    On,
    /// `off`: tear logging down.
    Off,
    /// `custom`: separate cluster and client overrides follow.
    Custom,
    /// A literal level.
    Numeric(LogLevel),
}

impl LevelArg {
    /// Converts a concrete tier into its numeric level.
    ///
    /// `off` and `custom` have no numeric meaning and are rejected.
    pub fn to_level(self) -> Result<LogLevel> {
        match self {
            Self::Low => Ok(LogLevel::LOW),
            Self::Medium => Ok(LogLevel::MEDIUM),
            Self::High | Self::On => Ok(LogLevel::HIGH),
            Self::Numeric(level) => Ok(level),
            Self::Off | Self::Custom => Err(ParalogError::InvalidLogLevel(self.to_string())),
        }
    }
}

impl FromStr for LevelArg {
    type Err = ParalogError;

    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        match token.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            "custom" => Ok(Self::Custom),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(|n| LogLevel::new(n).ok())
                .map(Self::Numeric)
                .ok_or_else(|| ParalogError::InvalidLogLevel(token.to_string())),
        }
    }
}

impl fmt::Display for LevelArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("low"),
            Self::Medium => f.write_str("medium"),
            Self::High => f.write_str("high"),
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Custom => f.write_str("custom"),
            Self::Numeric(level) => write!(f, "{level}"),
        }
    }
}

/// The outcome of normalizing a [`LoggingRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum LevelPlan {
    /// Turn logging on at the given levels.
    Enable {
        /// Level applied to the cluster side channel.
        cluster: LogLevel,
        /// Level applied to client logging.
        client: LogLevel,
    },
    /// Tear all logging channels down.
    Disable,
}

/// A validated request to change logging levels.
///
/// Construction enforces the combination rules, so a `LoggingRequest` always
/// normalizes into a [`LevelPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingRequest {
    plan: LevelPlan,
}

impl LoggingRequest {
    /// Validates a level and its optional overrides.
    ///
    /// - `custom` requires both overrides.
    /// - Overrides are only allowed with `custom` and must be concrete tiers.
    pub fn new(
        level: LevelArg,
        cluster_level: Option<LevelArg>,
        client_level: Option<LevelArg>,
    ) -> Result<Self> {
        let plan = match level {
            LevelArg::Custom => {
                let (Some(cluster), Some(client)) = (cluster_level, client_level) else {
                    return Err(ParalogError::MissingCustomLogLevel);
                };
                LevelPlan::Enable {
                    cluster: cluster.to_level()?,
                    client: client.to_level()?,
                }
            }
            other if cluster_level.is_some() || client_level.is_some() => {
                return Err(ParalogError::InvalidLevelCombination(other.to_string()));
            }
            LevelArg::Off => LevelPlan::Disable,
            other => {
                let level = other.to_level()?;
                LevelPlan::Enable {
                    cluster: level,
                    client: level,
                }
            }
        };
        Ok(Self { plan })
    }

    /// Parses string tokens and validates them.
    pub fn parse(level: &str, cluster_level: Option<&str>, client_level: Option<&str>) -> Result<Self> {
        let level = level.parse()?;
        let cluster_level = cluster_level.map(str::parse).transpose()?;
        let client_level = client_level.map(str::parse).transpose()?;
        Self::new(level, cluster_level, client_level)
    }

    /// Returns the normalized plan.
    #[must_use]
    pub const fn plan(&self) -> LevelPlan {
        self.plan
    }
}

/// Normalizes a level and optional overrides into `(cluster, client)` levels.
///
/// Returns `None` for `off`, in which case callers take the teardown path.
pub fn normalize(
    level: &str,
    cluster_level: Option<&str>,
    client_level: Option<&str>,
) -> Result<Option<(LogLevel, LogLevel)>> {
    match LoggingRequest::parse(level, cluster_level, client_level)?.plan() {
        LevelPlan::Enable { cluster, client } => Ok(Some((cluster, client))),
        LevelPlan::Disable => Ok(None),
    }
}
