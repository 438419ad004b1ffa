//! Sweep driver for paired executor test campaigns.
//!
//! This crate provides:
//!
//! - [`CampaignConfig`] - validated, file-loadable sweep and environment settings
//! - [`SweepDriver`] - the trial x chain length x executor count loop
//! - [`SweepPoint`] - sweep coordinates and the artifact naming convention
//! - [`CampaignReport`] - what was materialized and what failed
//!
//! # Design Principles
//!
//! - **Reproducible** - Campaigns are deterministic given a seed.
//! - **Paired** - Every sweep point yields an enhanced and a standard test that
//!   differ only in name and execution mode.
//! - **Explicit failure policy** - Fail-fast or skip-and-continue is configuration.

mod config;
mod error;
mod point;
mod report;
mod sweep;

pub use config::{
    CampaignConfig, FailurePolicy, LengthStep, PeriodSelection, RulesConfig, SweepConfig,
};
pub use error::{CampaignError, CampaignResult, ConfigError};
pub use point::SweepPoint;
pub use report::{CampaignReport, FailureRecord};
pub use sweep::SweepDriver;
