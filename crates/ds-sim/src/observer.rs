//! Interactive driver observer.

use ds_core::Tick;
use ds_fleet::WaypointPlanner;

use crate::{SimulationWorld, TickReport};

/// Callbacks invoked by [`Simulation`][crate::Simulation] around each tick.
///
/// All methods default to no-ops.  `on_tick_end` gets read-only access to
/// the whole world so a UI or recorder can take a
/// [`WorldSnapshot`][crate::WorldSnapshot] without the driver knowing about
/// any particular consumer.
///
/// # Example
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_tick_end(&mut self, report: &TickReport, _world: &SimulationWorld<WaypointPlanner>) {
///         println!("{}: {} pending, {} busy", report.now, report.pending, report.active_agents);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after the clock advanced, before any processing.
    fn on_tick_start(&mut self, _now: Tick) {}

    /// Called once the tick is fully processed.
    fn on_tick_end(&mut self, _report: &TickReport, _world: &SimulationWorld<WaypointPlanner>) {}

    /// Called after every reset with the freshly spawned world.
    fn on_reset(&mut self, _world: &SimulationWorld<WaypointPlanner>) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
