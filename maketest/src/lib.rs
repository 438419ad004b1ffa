//! Test configuration rules and the test materialization pipeline.
//!
//! This crate owns what happens to one sweep point once its timing is known:
//!
//! - [`Rules`] describing the test for the external generator
//! - [`Environment`] and [`Toolchain`] locating the external tools
//! - [`Materializer`] implementations that stage, generate, build, run and
//!   post-process a test
//!
//! # Design Principles
//!
//! - **Opaque outcome** - Callers only see success or a structured error.
//! - **No retries** - A failed stage is reported, never re-attempted.
//! - **Config-driven tools** - Every external command comes from configuration.

mod environment;
mod error;
mod pipeline;
mod rules;

pub use environment::{CommandSpec, Environment, Toolchain};
pub use error::{MaketestError, MaketestResult, Stage};
pub use pipeline::{DryRun, Job, Materializer, Options, Pipeline, RULES_FILE, TIMING_FILE};
pub use rules::{ExecutionMode, Rules};
