//! Period and execution-time mapping for chained periodic workloads.
//!
//! This crate turns utilisation fractions into concrete timing records: one
//! (period, execution time) pair per chain, with periods drawn from a stepped
//! search window. It does not know how the fractions were sampled or what the
//! records are used for.
//!
//! # Design Principles
//!
//! - **Fail, never clamp** - A fraction that cannot be placed in the window is an error.
//! - **Order preserving** - Record `i` always belongs to fraction `i`.
//! - **Whole microseconds** - Execution times are rounded to integral microseconds.

mod accumulate;
mod error;
mod mapper;
mod record;

pub use accumulate::accumulate;
pub use error::{TemporalError, TemporalResult};
pub use mapper::{
    map_to_temporal, GridMapper, TimingMapper, UniformGridMapper, DEFAULT_RESOLUTION,
};
pub use record::{PeriodRange, Temporal, MAX_GRID_PERIODS};
