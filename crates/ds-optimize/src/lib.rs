//! `ds-optimize` — workforce sizing by repeated batch simulation.
//!
//! A sweep runs every fleet size in `[min_agents, max_agents]` R times on a
//! lightweight world (agents start at the hub, straight routes, static
//! traffic), pools the repetitions per fleet size, and recommends one size.
//!
//! ```text
//! for n in min..=max          ← AbortHandle checked before every unit
//!   for r in 0..R             ← SimRng::for_unit(seed, n, r)
//!     run_repetition          → RepetitionStats       (on_unit_done)
//!   aggregate                 → ConfigurationResult   (on_configuration_done)
//! select_recommendation       → Recommendation        (on_sweep_end)
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`config`]    | `SweepConfig`, `BatchDemand`, normalization              |
//! | [`run`]       | `run_repetition`, `RepetitionStats`                      |
//! | [`aggregate`] | `ConfigurationResult`                                    |
//! | [`select`]    | `select_recommendation`, tiers and utilization bands     |
//! | [`sweep`]     | `WorkforceSweep`, `AbortHandle`, `SweepOutcome`          |
//! | [`observer`]  | `SweepObserver`, `NoopSweepObserver`                     |
//!
//! # Feature flags
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Units run on Rayon's pool; results match a serial sweep.  |

pub mod aggregate;
pub mod config;
pub mod error;
pub mod observer;
pub mod run;
pub mod select;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use aggregate::ConfigurationResult;
pub use config::{BatchDemand, DEFAULT_MAX_AGENTS, MAX_FLEET_SIZE, SweepConfig};
pub use error::{OptimizeError, OptimizeResult};
pub use observer::{NoopSweepObserver, SweepObserver};
pub use run::{RepetitionStats, run_repetition};
pub use select::{Recommendation, SelectionTier, UtilizationBand, select_recommendation};
pub use sweep::{AbortHandle, SweepOutcome, WorkforceSweep};
