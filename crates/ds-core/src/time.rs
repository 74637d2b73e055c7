//! Simulation time model.
//!
//! One `Tick` is one simulated minute.  Order placement, assignment and
//! fatigue bookkeeping happen on whole ticks; movement inside a tick is
//! continuous, so delivery instants are fractional minutes (`f64`) measured
//! on the same axis (`Tick(n)` ≡ `n as f64`).

use std::fmt;

/// Simulated minutes represented by one tick.
pub const MINUTES_PER_TICK: f64 = 1.0;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter, in whole simulated minutes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// This tick as a point on the continuous minute axis.
    #[inline]
    pub fn minutes(self) -> f64 {
        self.0 as f64 * MINUTES_PER_TICK
    }

    /// `true` when this tick falls on a multiple of `interval`; always `false`
    /// for a zero interval.
    #[inline]
    pub fn is_multiple_of(self, interval: u64) -> bool {
        interval > 0 && self.0.is_multiple_of(interval)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The world's clock.  Starts at `Tick::ZERO`; each driver tick advances it
/// by one simulated minute before any other processing.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick and return the new time.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.current_tick
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.current_tick
    }

    /// Break elapsed time into (hours, minutes) from the start of the run.
    pub fn elapsed_hm(&self) -> (u64, u32) {
        let total = self.current_tick.0;
        (total / 60, (total % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m) = self.elapsed_hm();
        write!(f, "{} ({:02}:{:02})", self.current_tick, h, m)
    }
}
