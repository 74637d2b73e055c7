//! `ds-sim` — the simulation world and the interactive driver.
//!
//! # One tick (one simulated minute)
//!
//! ```text
//! ① Clock     — t += 1; dynamic traffic redrawn at t = 1 and every 15 min.
//! ② Demand    — with probability `order_probability`, one order attempt
//!               sampled from the active demand pattern.
//! ③ Movement  — every agent spends one minute: travel, handling, delivery,
//!               fatigue (ds-fleet).
//! ④ Dispatch  — pending orders, oldest first, to the smallest-ETA free
//!               agent (ds-dispatch).
//! ⑤ Prune     — delivered orders leave the working set (kept in the log).
//! ⑥ Series    — (t, open orders, busy agents) appended to the live series.
//! ```
//!
//! Steps ①, ③, ④ and ⑤ are [`SimulationWorld`] methods shared with the
//! batch sweep in `ds-optimize`.
//!
//! # Cargo features
//!
//! | Feature | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Serde derives on parameters, statistics, snapshots, reports. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ds_sim::{NoopObserver, SimulationBuilder};
//!
//! let mut sim = SimulationBuilder::new().build()?;
//! sim.set_parameter("num_agents", 8.0)?;
//! sim.start();
//! sim.run_ticks(240, &mut NoopObserver);
//! println!("{:?}", sim.metrics());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod params;
pub mod series;
pub mod sim;
pub mod snapshot;
pub mod stats;
pub mod traffic;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::SimulationBuilder;
pub use error::{ConfigError, SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use params::{CostRates, ORDER_FREQUENCY_LEVELS, ParamValue, SimulationParameters};
pub use series::{LiveSeries, SeriesPoint};
pub use sim::{InteractiveWorld, RunState, Simulation, TickReport};
pub use snapshot::{AgentSummary, AgentView, OrderRecord, OrderView, RunReport, WorldSnapshot};
pub use stats::{DerivedMetrics, RunStatistics, std_dev_sample, utilization_pct};
pub use traffic::TrafficModel;
pub use world::{MovementSummary, SimulationWorld, WorldConfig};
