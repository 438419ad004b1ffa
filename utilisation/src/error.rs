//! Error types for utilisation derivation.

use std::fmt;

/// Result type for utilisation derivation.
pub type UtilResult<T> = Result<T, UtilError>;

/// Errors that can occur while deriving a utilisation vector.
#[derive(Debug, Clone, PartialEq)]
pub enum UtilError {
    /// No candidate met the minimum fraction within the attempt budget.
    DerivationExhausted {
        /// Number of candidates drawn before giving up.
        attempts: usize,
        /// The per-fragment floor that every candidate violated.
        min_fraction: f64,
    },

    /// The split generator returned a vector of the wrong length.
    SplitLength {
        /// Number of fragments requested.
        expected: usize,
        /// Number of values returned.
        actual: usize,
    },

    /// A sampling parameter is outside its valid domain.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for UtilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DerivationExhausted {
                attempts,
                min_fraction,
            } => {
                write!(
                    f,
                    "unable to derive suitable utilisation values: {attempts} attempts \
                     without every fraction reaching {min_fraction}"
                )
            }
            Self::SplitLength { expected, actual } => {
                write!(
                    f,
                    "split generator returned {actual} fractions, expected {expected}"
                )
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid sampling parameter {name} = {value}")
            }
        }
    }
}

impl std::error::Error for UtilError {}
