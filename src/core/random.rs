/*!
 * Random Source
 *
 * Every probabilistic decision in the simulation routes through
 * [`RandomSource`], so a run is reproducible from a seed and tests can pin
 * outcomes with [`StubRandom`].
 */

use super::limits::PROBABILITY_RESOLUTION;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of numbers in a closed range
pub trait RandomSource {
    /// Number in `[min, max]`, both inclusive
    fn get_number(&mut self, min: u32, max: u32) -> u32;

    /// Roll an event with the given probability
    ///
    /// A source that always returns `min` makes every non-zero probability
    /// succeed; one that always returns `max` fails everything below 1.0.
    fn chance(&mut self, probability: f64) -> bool {
        let threshold = (probability.clamp(0.0, 1.0) * PROBABILITY_RESOLUTION as f64).round() as u32;
        self.get_number(1, PROBABILITY_RESOLUTION) <= threshold
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn get_number(&mut self, min: u32, max: u32) -> u32 {
        (**self).get_number(min, max)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn get_number(&mut self, min: u32, max: u32) -> u32 {
        (**self).get_number(min, max)
    }
}

/// Production source backed by a seeded `StdRng`
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn get_number(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// What a [`StubRandom`] answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    /// Always the lower bound
    Min,
    /// Always the upper bound
    Max,
    /// A fixed value, clamped into the requested range
    Constant(u32),
}

/// Deterministic source for tests; the mode can be switched mid-run
#[derive(Debug, Clone)]
pub struct StubRandom {
    mode: StubMode,
}

impl StubRandom {
    pub fn new(mode: StubMode) -> Self {
        Self { mode }
    }

    pub fn min() -> Self {
        Self::new(StubMode::Min)
    }

    pub fn max() -> Self {
        Self::new(StubMode::Max)
    }

    pub fn set_mode(&mut self, mode: StubMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> StubMode {
        self.mode
    }
}

impl RandomSource for StubRandom {
    fn get_number(&mut self, min: u32, max: u32) -> u32 {
        match self.mode {
            StubMode::Min => min,
            StubMode::Max => max,
            StubMode::Constant(value) => value.clamp(min, max.max(min)),
        }
    }
}
