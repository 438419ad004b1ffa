//! Rejection sampling of utilisation vectors with a per-fragment floor.

use tracing::debug;

use crate::error::{UtilError, UtilResult};
use crate::split::SplitGenerator;

/// An accepted utilisation split.
///
/// Every element is at least the floor it was sampled against. The vector is
/// immutable once accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct UtilisationVector(Vec<f64>);

impl UtilisationVector {
    /// Returns the fractions in fragment order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of fragments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector has no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the sum of all fractions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Returns the smallest fraction, or `None` when empty.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.0.iter().copied().reduce(f64::min)
    }

    /// Consumes the vector and returns the raw fractions.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for UtilisationVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Parameters for deriving a utilisation vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilisationSampler {
    /// Smallest acceptable per-fragment share (inclusive).
    pub min_fraction: f64,
    /// Sum every candidate must hit.
    pub total: f64,
    /// Number of candidates drawn before giving up.
    pub max_attempts: usize,
    /// Vector length.
    pub fragments: usize,
}

impl UtilisationSampler {
    #[must_use]
    pub const fn new(min_fraction: f64, total: f64, max_attempts: usize, fragments: usize) -> Self {
        Self {
            min_fraction,
            total,
            max_attempts,
            fragments,
        }
    }

    /// Checks the parameters without drawing any candidate.
    pub fn validate(&self) -> UtilResult<()> {
        if self.fragments == 0 {
            return Err(UtilError::InvalidParameter {
                name: "fragments",
                value: 0.0,
            });
        }
        if !self.total.is_finite() || self.total <= 0.0 {
            return Err(UtilError::InvalidParameter {
                name: "total",
                value: self.total,
            });
        }
        if !(self.min_fraction > 0.0 && self.min_fraction < 1.0) {
            return Err(UtilError::InvalidParameter {
                name: "min_fraction",
                value: self.min_fraction,
            });
        }
        Ok(())
    }

    /// Draws candidates until one meets the floor or the budget runs out.
    ///
    /// The first acceptable candidate is returned unchanged and no further
    /// candidates are drawn.
    pub fn derive<G>(&self, generator: &mut G) -> UtilResult<UtilisationVector>
    where
        G: SplitGenerator + ?Sized,
    {
        self.validate()?;

        for attempt in 1..=self.max_attempts {
            let candidate = generator.split(self.total, self.fragments);
            if candidate.len() != self.fragments {
                return Err(UtilError::SplitLength {
                    expected: self.fragments,
                    actual: candidate.len(),
                });
            }
            if meets_floor(&candidate, self.min_fraction) {
                debug!(attempt, fragments = self.fragments, "accepted utilisation split");
                return Ok(UtilisationVector(candidate));
            }
        }

        Err(UtilError::DerivationExhausted {
            attempts: self.max_attempts,
            min_fraction: self.min_fraction,
        })
    }
}

/// Derives a utilisation vector of `fragments` values summing to `total`
/// where no value is below `min_fraction`.
pub fn derive_utilisation<G>(
    min_fraction: f64,
    total: f64,
    max_attempts: usize,
    fragments: usize,
    generator: &mut G,
) -> UtilResult<UtilisationVector>
where
    G: SplitGenerator + ?Sized,
{
    UtilisationSampler::new(min_fraction, total, max_attempts, fragments).derive(generator)
}

fn meets_floor(candidate: &[f64], min_fraction: f64) -> bool {
    candidate.iter().all(|u| *u >= min_fraction)
}
