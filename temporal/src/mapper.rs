//! Mapping of utilisation fractions onto (period, execution time) pairs.

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::error::{TemporalError, TemporalResult};
use crate::record::{PeriodRange, Temporal};

/// Default relative tolerance between the requested fraction and `C / T`.
pub const DEFAULT_RESOLUTION: f64 = 0.01;

/// Turns a utilisation vector into one timing record per chain.
///
/// Implementations preserve order and length, and fail rather than clamp when
/// a fraction cannot be placed in the window.
pub trait TimingMapper {
    /// Maps each fraction onto a period from the `step_us` grid over `range`.
    fn map(
        &mut self,
        range: PeriodRange,
        step_us: f64,
        utilisations: &[f64],
    ) -> TemporalResult<Vec<Temporal>>;
}

impl<M: TimingMapper + ?Sized> TimingMapper for Box<M> {
    fn map(
        &mut self,
        range: PeriodRange,
        step_us: f64,
        utilisations: &[f64],
    ) -> TemporalResult<Vec<Temporal>> {
        (**self).map(range, step_us, utilisations)
    }
}

/// Picks the smallest grid period that reproduces each fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMapper {
    /// Largest accepted relative error between the fraction and `C / T`.
    pub resolution: f64,
}

impl Default for GridMapper {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl TimingMapper for GridMapper {
    fn map(
        &mut self,
        range: PeriodRange,
        step_us: f64,
        utilisations: &[f64],
    ) -> TemporalResult<Vec<Temporal>> {
        map_with(range, step_us, utilisations, self.resolution, |candidates| {
            candidates.next()
        })
    }
}

/// Picks a grid period uniformly among those that reproduce each fraction.
#[derive(Debug, Clone)]
pub struct UniformGridMapper<R = StdRng> {
    /// Largest accepted relative error between the fraction and `C / T`.
    pub resolution: f64,
    rng: R,
}

impl UniformGridMapper<StdRng> {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformGridMapper<R> {
    pub const fn with_rng(rng: R) -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            rng,
        }
    }
}

impl<R: Rng> TimingMapper for UniformGridMapper<R> {
    fn map(
        &mut self,
        range: PeriodRange,
        step_us: f64,
        utilisations: &[f64],
    ) -> TemporalResult<Vec<Temporal>> {
        let rng = &mut self.rng;
        map_with(range, step_us, utilisations, self.resolution, |candidates| {
            candidates.choose(&mut *rng)
        })
    }
}

/// Maps `utilisations` with the default [`GridMapper`].
pub fn map_to_temporal(
    range: PeriodRange,
    step_us: f64,
    utilisations: &[f64],
) -> TemporalResult<Vec<Temporal>> {
    GridMapper::default().map(range, step_us, utilisations)
}

fn map_with<F>(
    range: PeriodRange,
    step_us: f64,
    utilisations: &[f64],
    resolution: f64,
    mut choose: F,
) -> TemporalResult<Vec<Temporal>>
where
    F: FnMut(&mut dyn Iterator<Item = Temporal>) -> Option<Temporal>,
{
    range.validate_step(step_us)?;

    let mut records = Vec::with_capacity(utilisations.len());
    for (index, &utilisation) in utilisations.iter().enumerate() {
        if !(utilisation > 0.0 && utilisation <= 1.0) {
            return Err(TemporalError::InvalidUtilisation { index, utilisation });
        }
        let mut candidates = range
            .grid(step_us)?
            .filter_map(|period_us| place(period_us, utilisation, resolution));
        let record =
            choose(&mut candidates).ok_or(TemporalError::Unmappable { index, utilisation })?;
        records.push(record);
    }
    Ok(records)
}

/// Execution time is whole microseconds and at least one.
fn place(period_us: f64, utilisation: f64, resolution: f64) -> Option<Temporal> {
    let exec_us = (utilisation * period_us).round();
    if exec_us < 1.0 || exec_us > period_us {
        return None;
    }
    let record = Temporal::new(period_us, exec_us);
    ((record.utilisation() - utilisation).abs() <= resolution * utilisation).then_some(record)
}
