//! Sweep progress callbacks.

use crate::{ConfigurationResult, RepetitionStats, SweepOutcome};

/// Callbacks invoked by [`WorkforceSweep::run`][crate::WorkforceSweep::run].
///
/// All methods default to no-ops.  `on_configuration_done` runs between
/// fleet sizes, so an observer holding an
/// [`AbortHandle`][crate::AbortHandle] clone can stop the sweep there.
/// With the `parallel` feature the unit and configuration hooks fire after
/// all units have finished, still in fleet-size then repetition order.
pub trait SweepObserver {
    fn on_unit_done(&mut self, _stats: &RepetitionStats) {}

    fn on_configuration_done(&mut self, _result: &ConfigurationResult) {}

    fn on_sweep_end(&mut self, _outcome: &SweepOutcome) {}
}

/// A [`SweepObserver`] that does nothing.
pub struct NoopSweepObserver;

impl SweepObserver for NoopSweepObserver {}
