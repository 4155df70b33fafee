//! Random objective weights.
//!
//! The constraints alone usually admit many selections. Maximizing a fresh
//! random weight per recipe picks one of them at random, so repeated runs
//! over the same menu vary.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Weights are drawn from `[0, MAX_WEIGHT)`.
pub const MAX_WEIGHT: f64 = 10.0;

/// Isolated generator for tie-breaking weights.
///
/// # Example
///
/// ```
/// use menuforge_solver::objective::{TieBreaker, MAX_WEIGHT};
///
/// let mut a = TieBreaker::with_seed(42);
/// let mut b = TieBreaker::with_seed(42);
/// let weights = a.draw(5);
///
/// assert_eq!(weights, b.draw(5));
/// assert!(weights.iter().all(|w| (0.0..MAX_WEIGHT).contains(w)));
/// ```
#[derive(Debug, Clone)]
pub struct TieBreaker {
    rng: ChaCha8Rng,
}

impl TieBreaker {
    /// Creates a generator seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Creates a reproducible generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws `count` independent weights.
    pub fn draw(&mut self, count: usize) -> Vec<f64> {
        (0..count)
            .map(|_| self.rng.random_range(0.0..MAX_WEIGHT))
            .collect()
    }
}

impl Default for TieBreaker {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
