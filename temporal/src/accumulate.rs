//! Growth of a working timing set between chain-length iterations.

use crate::error::{TemporalError, TemporalResult};
use crate::record::Temporal;

/// Adds one base execution chunk to every working record and recomputes the
/// period so each chain keeps its original utilisation.
///
/// `work[i].C += base[i].C`, then `work[i].T = work[i].C / utilisations[i]`.
/// The slices must have equal length. A zero fraction has no period and is
/// reported as unmappable. The working set is left untouched on error.
pub fn accumulate(
    work: &mut [Temporal],
    base: &[Temporal],
    utilisations: &[f64],
) -> TemporalResult<()> {
    for actual in [base.len(), utilisations.len()] {
        if actual != work.len() {
            return Err(TemporalError::LengthMismatch {
                expected: work.len(),
                actual,
            });
        }
    }
    if let Some((index, &utilisation)) = utilisations
        .iter()
        .enumerate()
        .find(|(_, u)| !(**u > 0.0 && u.is_finite()))
    {
        return Err(TemporalError::Unmappable { index, utilisation });
    }

    for ((record, chunk), utilisation) in work.iter_mut().zip(base).zip(utilisations) {
        record.exec_us += chunk.exec_us;
        record.period_us = record.exec_us / utilisation;
    }
    Ok(())
}
