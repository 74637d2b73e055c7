//! Deterministic simulation RNG.
//!
//! # Determinism strategy
//!
//! A world owns exactly one `SimRng`; every stochastic decision in a run
//! (spawn jitter, speeds, order generation, sampling, waypoint jitter,
//! traffic) draws from it in a fixed order, so a seed reproduces a run.
//!
//! Batch sweeps need one independent stream per (fleet size, repetition)
//! unit.  Those are derived without touching a shared generator:
//!
//!   seed = base ^ (fleet * MIXING_CONSTANT) ^ ((rep + 1) * MIXING_CONSTANT.rotate_left(17))
//!
//! so serial and parallel sweeps see identical streams.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simulation-level RNG.  `!Sync`: each batch worker builds its own.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Independent stream for one batch unit.
    pub fn for_unit(seed: u64, fleet_size: usize, repetition: usize) -> Self {
        let a = (fleet_size as u64).wrapping_mul(MIXING_CONSTANT);
        let b = (repetition as u64 + 1).wrapping_mul(MIXING_CONSTANT.rotate_left(17));
        SimRng::new(seed ^ a ^ b)
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform value in `[lo, hi)`.  Unlike `gen_range` this accepts an
    /// empty interval and returns `lo`.
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.0.r#gen::<f64>()
    }

    /// Uniform value in `[-half, half)`.
    #[inline]
    pub fn symmetric(&mut self, half: f64) -> f64 {
        (self.0.r#gen::<f64>() - 0.5) * 2.0 * half
    }

    /// Pair of independent standard-normal draws (Box-Muller).
    pub fn standard_normal_pair(&mut self) -> (f64, f64) {
        // 1 - U maps [0, 1) onto (0, 1] so ln never sees zero.
        let u1 = 1.0 - self.0.r#gen::<f64>();
        let u2 = self.0.r#gen::<f64>();
        let r = (-2.0 * u1.ln()).sqrt();
        (r * (TAU * u2).cos(), r * (TAU * u2).sin())
    }

    /// Choose a random element from a slice.  `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Index drawn with probability proportional to `weights[i]`.
    ///
    /// Negative and non-finite weights count as zero.  `None` when nothing
    /// has positive weight.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f64 = weights.iter().map(|&w| clean(w)).sum();
        if total <= 0.0 {
            return None;
        }
        let mut pick = self.0.r#gen::<f64>() * total;
        let mut last_positive = None;
        for (i, &w) in weights.iter().enumerate() {
            let w = clean(w);
            if w == 0.0 {
                continue;
            }
            if pick < w {
                return Some(i);
            }
            pick -= w;
            last_positive = Some(i);
        }
        // Rounding can leave `pick` a hair above the final weight.
        last_positive
    }
}
