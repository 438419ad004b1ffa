//! Rejection-sampled utilisation splits for chained periodic workloads.
//!
//! This crate provides [`UtilisationSampler`], which draws candidate splits of a
//! total utilisation from an injected [`SplitGenerator`] and accepts the first
//! one where every fragment meets a minimum share.
//!
//! # Design Principles
//!
//! - **Injected randomness** - The split distribution is a parameter, so the
//!   rejection loop can be driven by a deterministic stub.
//! - **Bounded retries** - The attempt budget turns an open-ended loop into a
//!   structured error.
//! - **No timing knowledge** - This crate knows nothing about periods or chains.
//!
//! # Example
//!
//! ```
//! use utilisation::{derive_utilisation, UUniFast};
//!
//! let mut generator = UUniFast::seeded(3);
//! let split = derive_utilisation(0.05, 0.6, 5000, 5, &mut generator).unwrap();
//!
//! assert_eq!(split.len(), 5);
//! assert!(split.min().unwrap() >= 0.05);
//! assert!((split.total() - 0.6).abs() < 1e-9);
//! ```

mod error;
mod sampler;
mod split;

pub use error::{UtilError, UtilResult};
pub use sampler::{derive_utilisation, UtilisationSampler, UtilisationVector};
pub use split::{SplitGenerator, UUniFast};
