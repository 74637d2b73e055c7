//! Traffic multiplier.
//!
//! Static runs use `base_traffic_factor` throughout.  Dynamic runs draw a
//! new factor from [`TRAFFIC_LEVELS`] at t = 1 and whenever t is a
//! multiple of [`TRAFFIC_RESAMPLE_INTERVAL_MIN`].

use ds_core::{SimRng, Tick};

pub const TRAFFIC_LEVELS: [f64; 7] = [0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3];
pub const TRAFFIC_RESAMPLE_INTERVAL_MIN: u64 = 15;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficModel {
    pub base:    f64,
    pub dynamic: bool,
    current:     f64,
}

impl TrafficModel {
    pub fn fixed(base: f64) -> Self {
        Self { base, dynamic: false, current: base }
    }

    pub fn dynamic(base: f64) -> Self {
        Self { base, dynamic: true, current: base }
    }

    /// Factor in effect right now.
    #[inline]
    pub fn factor(&self) -> f64 {
        if self.dynamic { self.current } else { self.base }
    }

    /// Resample if `now` is a resample point.  Returns the new factor when
    /// it was redrawn.
    pub fn update(&mut self, now: Tick, rng: &mut SimRng) -> Option<f64> {
        if !self.dynamic || !(now == Tick(1) || now.is_multiple_of(TRAFFIC_RESAMPLE_INTERVAL_MIN)) {
            return None;
        }
        let level = rng.choose(&TRAFFIC_LEVELS).copied().unwrap_or(self.base);
        self.current = level;
        tracing::debug!(%now, factor = level, "traffic resampled");
        Some(level)
    }
}
