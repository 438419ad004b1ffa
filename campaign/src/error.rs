//! Error types for campaign configuration and execution.

use std::fmt;
use std::path::PathBuf;

use maketest::MaketestError;
use temporal::TemporalError;
use utilisation::UtilError;

use crate::point::SweepPoint;

/// Result type for campaign operations.
pub type CampaignResult<T> = Result<T, CampaignError>;

/// Errors that can occur while loading or validating a campaign configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration file could not be read.
    Read { path: PathBuf, message: String },

    /// Configuration file is not valid JSON for the schema.
    Parse { path: PathBuf, message: String },

    /// A field holds a value the sweep cannot use.
    Invalid { field: &'static str, reason: String },
}

/// Errors that abort (or, when skipping, are recorded by) a campaign.
#[derive(Debug)]
pub enum CampaignError {
    /// Invalid configuration.
    Config(ConfigError),

    /// No acceptable utilisation split for a trial.
    Derivation { trial: u64, source: UtilError },

    /// Utilisations of a trial could not be mapped to timing.
    TimingMapping { trial: u64, source: TemporalError },

    /// The test pipeline failed for one artifact.
    Materialization {
        point: SweepPoint,
        name: String,
        source: MaketestError,
    },
}

impl CampaignError {
    /// Trial the error belongs to, if any.
    #[must_use]
    pub const fn trial(&self) -> Option<u64> {
        match self {
            Self::Config(_) => None,
            Self::Derivation { trial, .. } | Self::TimingMapping { trial, .. } => Some(*trial),
            Self::Materialization { point, .. } => Some(point.trial),
        }
    }

    /// Name of the artifact being materialized when the error occurred.
    #[must_use]
    pub fn artifact(&self) -> Option<&str> {
        match self {
            Self::Materialization { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => {
                write!(f, "read config {}: {message}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "parse config {}: {message}", path.display())
            }
            Self::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl fmt::Display for CampaignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Derivation { trial, source } => {
                write!(f, "trial {trial}: utilisation derivation failed: {source}")
            }
            Self::TimingMapping { trial, source } => {
                write!(f, "trial {trial}: timing mapping failed: {source}")
            }
            Self::Materialization { name, source, .. } => {
                write!(f, "test {name}: materialization failed: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl std::error::Error for CampaignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Derivation { source, .. } => Some(source),
            Self::TimingMapping { source, .. } => Some(source),
            Self::Materialization { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for CampaignError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}
