//! Random fixed-sum split generators.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of candidate utilisation splits.
///
/// An implementation returns `fragments` non-negative values summing to
/// `total`. The sampler treats it as a stochastic oracle and calls it once per
/// attempt.
pub trait SplitGenerator {
    /// Draws one candidate split of `total` across `fragments` components.
    fn split(&mut self, total: f64, fragments: usize) -> Vec<f64>;
}

impl<F> SplitGenerator for F
where
    F: FnMut(f64, usize) -> Vec<f64>,
{
    fn split(&mut self, total: f64, fragments: usize) -> Vec<f64> {
        self(total, fragments)
    }
}

/// UUniFast split generator (Bini and Buttazzo).
///
/// Produces splits uniformly distributed over the simplex of vectors summing
/// to `total`.
#[derive(Debug, Clone)]
pub struct UUniFast<R = StdRng> {
    rng: R,
}

impl UUniFast<StdRng> {
    /// Creates a generator with a deterministic seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> UUniFast<R> {
    /// Wraps an existing random number generator.
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SplitGenerator for UUniFast<R> {
    fn split(&mut self, total: f64, fragments: usize) -> Vec<f64> {
        if fragments == 0 {
            return Vec::new();
        }
        let mut values = vec![0.0; fragments];
        let mut remaining = total;
        for i in (1..fragments).rev() {
            let next = remaining * self.rng.gen::<f64>().powf(1.0 / i as f64);
            values[i] = remaining - next;
            remaining = next;
        }
        values[0] = remaining;
        values
    }
}
