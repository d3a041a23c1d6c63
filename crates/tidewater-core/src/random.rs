//! Injected randomness for catch rolls, weather drift, and idle catch-up.
//!
//! Every stochastic decision in the core goes through [`RandomSource`], so
//! production code can run on a real generator ([`RngSource`]) while tests
//! replay exact draws with [`ScriptedRandom`].

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Source of the two kinds of draw the catch model needs.
pub trait RandomSource {
    /// A float drawn uniformly from `[low, high)`. Returns `low` when the
    /// range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// An index drawn uniformly from `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// A generator with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.0.random_range(low..high)
        } else {
            low
        }
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0.random_range(0..len)
        }
    }
}

/// A [`RandomSource`] that replays queued values.
///
/// Uniform draws pop from one queue and index draws from another. Each queued
/// uniform value is used as-is, without rescaling into the requested range.
/// An exhausted queue yields the lowest possible value (`low` or 0), which
/// keeps tests short when later draws do not matter.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    uniforms: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue uniform draws, consumed in order.
    #[must_use]
    pub fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.uniforms.extend(values);
        self
    }

    /// Queue index draws, consumed in order.
    #[must_use]
    pub fn with_indices(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(values);
        self
    }

    /// Uniform draws not yet consumed.
    pub fn remaining_uniforms(&self) -> usize {
        self.uniforms.len()
    }

    /// Index draws not yet consumed.
    pub fn remaining_indices(&self) -> usize {
        self.indices.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, low: f64, _high: f64) -> f64 {
        self.uniforms.pop_front().unwrap_or(low)
    }

    fn index(&mut self, len: usize) -> usize {
        match self.indices.pop_front() {
            Some(i) if i < len => i,
            Some(_) => len.saturating_sub(1),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn rng_source_stays_in_range() {
        let mut rng = RngSource(SmallRng::seed_from_u64(42));
        for _ in 0..1_000 {
            let v = rng.uniform(0.7, 1.3);
            assert!((0.7..1.3).contains(&v));
            assert!(rng.index(7) < 7);
        }
    }

    #[test]
    fn degenerate_ranges_do_not_panic() {
        let mut rng = RngSource(SmallRng::seed_from_u64(1));
        assert!((rng.uniform(2.0, 2.0) - 2.0).abs() < f64::EPSILON);
        assert_eq!(rng.index(0), 0);
    }

    #[test]
    fn scripted_values_replay_in_order() {
        let mut script = ScriptedRandom::new()
            .with_uniforms([3.0, 0.5])
            .with_indices([2, 9]);
        assert!((script.uniform(0.0, 10.0) - 3.0).abs() < f64::EPSILON);
        assert!((script.uniform(0.0, 1.0) - 0.5).abs() < f64::EPSILON);
        assert!((script.uniform(0.25, 1.0) - 0.25).abs() < f64::EPSILON);
        assert_eq!(script.index(4), 2);
        // Out-of-range scripted index is clamped to the last slot.
        assert_eq!(script.index(4), 3);
        assert_eq!(script.index(4), 0);
        assert_eq!(script.remaining_uniforms(), 0);
        assert_eq!(script.remaining_indices(), 0);
    }
}
