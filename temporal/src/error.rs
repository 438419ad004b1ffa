//! Error types for timing mapping.

use std::fmt;

/// Result type for timing mapping.
pub type TemporalResult<T> = Result<T, TemporalError>;

/// Errors that can occur while turning utilisations into timing records.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TemporalError {
    /// Period range is empty, inverted, or non-positive.
    InvalidRange { min_us: f64, max_us: f64 },

    /// Period step is not a positive finite value.
    InvalidStep { step_us: f64 },

    /// The window holds more grid periods than a mapper will search.
    GridTooLarge { periods: f64, limit: usize },

    /// Utilisation fraction is outside (0, 1].
    InvalidUtilisation { index: usize, utilisation: f64 },

    /// No period in the window reproduces the fraction.
    Unmappable { index: usize, utilisation: f64 },

    /// Working, base, and utilisation sets disagree in length.
    LengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TemporalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRange { min_us, max_us } => {
                write!(f, "invalid period range [{min_us}, {max_us}] us")
            }
            Self::InvalidStep { step_us } => {
                write!(f, "invalid period step {step_us} us")
            }
            Self::GridTooLarge { periods, limit } => {
                write!(f, "period grid has {periods} entries, limit is {limit}")
            }
            Self::InvalidUtilisation { index, utilisation } => {
                write!(
                    f,
                    "utilisation {utilisation} of chain {index} is outside (0, 1]"
                )
            }
            Self::Unmappable { index, utilisation } => {
                write!(
                    f,
                    "no period in the window maps utilisation {utilisation} of chain {index}"
                )
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} timing records, found {actual}")
            }
        }
    }
}

impl std::error::Error for TemporalError {}
