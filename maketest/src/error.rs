//! Error types for test materialization.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for test materialization.
pub type MaketestResult<T> = Result<T, MaketestError>;

/// Errors that can occur while materializing a test.
#[derive(Debug)]
pub enum MaketestError {
    /// Filesystem operation failed.
    Io { path: PathBuf, source: io::Error },

    /// Rules or timing could not be serialized.
    Serialize {
        /// Which document was being written (`rules` or `timing`).
        what: &'static str,
        source: serde_json::Error,
    },

    /// A stage command could not be started.
    Spawn {
        stage: Stage,
        program: String,
        source: io::Error,
    },

    /// A stage command exited unsuccessfully.
    StageFailed {
        stage: Stage,
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
    },
}

/// Pipeline stage in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Prepare,
    Generate,
    Build,
    ResetLog,
    Run,
    Postprocess,
}

impl fmt::Display for MaketestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialize { what, source } => write!(f, "serialize {what}: {source}"),
            Self::Spawn {
                stage,
                program,
                source,
            } => {
                write!(f, "{stage} stage could not start {program}: {source}")
            }
            Self::StageFailed {
                stage,
                status: Some(code),
            } => write!(f, "{stage} stage exited with status {code}"),
            Self::StageFailed {
                stage,
                status: None,
            } => write!(f, "{stage} stage terminated by signal"),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prepare => "prepare",
            Self::Generate => "generate",
            Self::Build => "build",
            Self::ResetLog => "reset-log",
            Self::Run => "run",
            Self::Postprocess => "postprocess",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for MaketestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } | Self::Spawn { source, .. } => Some(source),
            Self::Serialize { source, .. } => Some(source),
            Self::StageFailed { .. } => None,
        }
    }
}

impl MaketestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
