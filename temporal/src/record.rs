//! Timing records and the period search window.

use crate::error::{TemporalError, TemporalResult};

/// Upper bound on the number of periods in one grid.
pub const MAX_GRID_PERIODS: usize = 1_000_000;

/// Period and execution time of one chain, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Temporal {
    /// Chain period (T).
    pub period_us: f64,
    /// Chain execution time (C).
    pub exec_us: f64,
}

impl Temporal {
    #[must_use]
    pub const fn new(period_us: f64, exec_us: f64) -> Self {
        Self { period_us, exec_us }
    }

    /// Returns `exec_us / period_us`.
    #[must_use]
    pub fn utilisation(&self) -> f64 {
        self.exec_us / self.period_us
    }
}

/// Inclusive window of candidate periods, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeriodRange {
    /// Shortest candidate period.
    pub min_us: f64,
    /// Longest candidate period (inclusive).
    pub max_us: f64,
}

impl PeriodRange {
    #[must_use]
    pub const fn new(min_us: f64, max_us: f64) -> Self {
        Self { min_us, max_us }
    }

    /// Checks that the window is finite, positive and not inverted.
    pub fn validate(&self) -> TemporalResult<()> {
        let finite = self.min_us.is_finite() && self.max_us.is_finite();
        if !finite || self.min_us <= 0.0 || self.min_us > self.max_us {
            return Err(TemporalError::InvalidRange {
                min_us: self.min_us,
                max_us: self.max_us,
            });
        }
        Ok(())
    }

    /// Returns `true` if `period_us` lies inside the window.
    #[must_use]
    pub fn contains(&self, period_us: f64) -> bool {
        period_us >= self.min_us && period_us <= self.max_us
    }

    /// Checks the window, that `step_us` is a positive finite step, and that
    /// the grid holds at most [`MAX_GRID_PERIODS`] periods.
    pub fn validate_step(&self, step_us: f64) -> TemporalResult<()> {
        self.validate()?;
        if !step_us.is_finite() || step_us <= 0.0 {
            return Err(TemporalError::InvalidStep { step_us });
        }
        let periods = ((self.max_us - self.min_us) / step_us).floor() + 1.0;
        if periods > MAX_GRID_PERIODS as f64 {
            return Err(TemporalError::GridTooLarge {
                periods,
                limit: MAX_GRID_PERIODS,
            });
        }
        Ok(())
    }

    /// Iterates `min, min + step, ...` up to and including `max`.
    pub fn grid(&self, step_us: f64) -> TemporalResult<impl Iterator<Item = f64>> {
        self.validate_step(step_us)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = ((self.max_us - self.min_us) / step_us).floor() as usize;
        let (min_us, max_us) = (self.min_us, self.max_us);
        Ok((0..=steps)
            .map(move |k| (k as f64).mul_add(step_us, min_us))
            .take_while(move |period_us| *period_us <= max_us))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_includes_both_ends_when_aligned() {
        let grid: Vec<f64> = PeriodRange::new(1000.0, 3000.0).grid(1000.0).unwrap().collect();
        assert_eq!(grid, vec![1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn grid_stops_before_max_when_unaligned() {
        let grid: Vec<f64> = PeriodRange::new(1000.0, 1_000_000.0)
            .grid(50_000.0)
            .unwrap()
            .collect();
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[0], 1000.0);
        assert_eq!(grid[19], 951_000.0);
    }

    #[test]
    fn degenerate_range_has_one_period() {
        let grid: Vec<f64> = PeriodRange::new(500.0, 500.0).grid(10.0).unwrap().collect();
        assert_eq!(grid, vec![500.0]);
    }

    #[test]
    fn invalid_windows_rejected() {
        assert!(PeriodRange::new(10.0, 5.0).validate().is_err());
        assert!(PeriodRange::new(0.0, 5.0).validate().is_err());
        assert!(PeriodRange::new(1.0, f64::INFINITY).validate().is_err());
        assert!(matches!(
            PeriodRange::new(1.0, 5.0).validate_step(0.0),
            Err(TemporalError::InvalidStep { .. })
        ));
    }

    #[test]
    fn oversized_grid_rejected() {
        let err = PeriodRange::new(1.0, 1e12).validate_step(1.0).unwrap_err();
        assert!(matches!(
            err,
            TemporalError::GridTooLarge {
                limit: MAX_GRID_PERIODS,
                ..
            }
        ));
        assert!(PeriodRange::new(1.0, 1e12).grid(1.0).is_err());
    }

    #[test]
    fn grid_at_limit_is_accepted() {
        let range = PeriodRange::new(1.0, MAX_GRID_PERIODS as f64);
        range.validate_step(1.0).unwrap();
        assert!(range.validate_step(0.5).is_err());
        assert_eq!(range.grid(1.0).unwrap().count(), MAX_GRID_PERIODS);
    }

    #[test]
    fn temporal_utilisation() {
        assert!((Temporal::new(1000.0, 250.0).utilisation() - 0.25).abs() < f64::EPSILON);
    }
}
