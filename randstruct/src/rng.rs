//! Sources of uniform randomness.
//!
//! Every sampler in this crate is written against [`UniformSource`], which
//! only promises two things: a fresh draw in `[0, 1)` and a uniform integer in
//! a closed range. Two sources ship with the crate:
//!
//! - [`RandSource`]: an adapter over any `rand::Rng` (seeded or OS entropy)
//! - [`ReplaySource`]: replays a fixed list of draws, for pinning exact outcomes
//!
//! [`SourceRng`] goes the other way and lets `rand_distr` distributions draw
//! from any `UniformSource`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A source of independent uniform draws.
///
/// ## Rust Lesson #31: Default Methods
///
/// A trait can ship method bodies. Implementors only have to provide
/// `uniform()`; `uniform_int()` and `coin()` come for free but may be
/// overridden when the source can do better (as [`RandSource`] does).
pub trait UniformSource {
    /// A fresh draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// A uniform integer in `[low, high]`, inclusive at both ends.
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        debug_assert!(low <= high, "empty range {}..={}", low, high);
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        (low + (self.uniform() * span) as usize).min(high)
    }

    /// A fair coin.
    fn coin(&mut self) -> bool {
        self.uniform_int(0, 1) == 1
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }

    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        (**self).uniform_int(low, high)
    }

    fn coin(&mut self) -> bool {
        (**self).coin()
    }
}

/// Adapter that lets any `rand` generator drive the samplers.
///
/// It is also an `RngCore` itself, so the same source can be handed to the
/// `rand_distr`-backed functions in [`crate::variates`].
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng> RandSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandSource<StdRng> {
    /// Reproducible source: the same seed yields the same samples.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from operating-system entropy.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> UniformSource for RandSource<R> {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        debug_assert!(low <= high, "empty range {}..={}", low, high);
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn coin(&mut self) -> bool {
        self.rng.random::<bool>()
    }
}

impl<R: RngCore> RngCore for RandSource<R> {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}

/// Presents a [`UniformSource`] as a `rand` generator.
///
/// Each `next_u64` spends one uniform draw and places its 53 significant
/// bits at the top of the word, which is where `rand` reads floats from, so
/// a float drawn through the bridge is the draw itself.
pub struct SourceRng<'a, S: UniformSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: UniformSource + ?Sized> SourceRng<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }
}

impl<S: UniformSource + ?Sized> RngCore for SourceRng<'_, S> {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let bits = (self.source.uniform() * (1u64 << 53) as f64) as u64;
        bits << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Replays a fixed list of uniform draws, cycling when exhausted.
///
/// Lets a test say "the next draw is exactly 0.2" and check which bucket
/// the weighted picker lands in.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    draws: Vec<f64>,
    next: usize,
}

impl ReplaySource {
    /// Draws outside `[0, 1)` are clamped into it.
    pub fn new(draws: Vec<f64>) -> Self {
        assert!(!draws.is_empty(), "ReplaySource needs at least one draw");
        let draws = draws
            .into_iter()
            .map(|u| u.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { draws, next: 0 }
    }

    /// How many draws have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl UniformSource for ReplaySource {
    fn uniform(&mut self) -> f64 {
        let u = self.draws[self.next % self.draws.len()];
        self.next += 1;
        u
    }
}
