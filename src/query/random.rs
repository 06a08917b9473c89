//! Injected randomness for image selection
//!
//! Random selection goes through the [`RandomSource`] trait rather than a
//! shared mutable generator, so tests can substitute a deterministic
//! source. The process-wide default wraps the thread-local generator.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random indices
pub trait RandomSource: Send + Sync {
    /// Pick an index uniformly from `0..len`
    ///
    /// Callers must ensure `len` is non-zero; selection over an empty set
    /// is handled before reaching the source.
    fn pick(&self, len: usize) -> usize;
}

/// Default source backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Deterministic source for reproducible selections
///
/// Produces the same pick sequence for the same seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Create a source seeded with `seed`
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..len)
    }
}
