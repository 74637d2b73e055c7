//! The sweep driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ds_core::GeoPoint;
use ds_demand::CityMap;

use crate::{
    ConfigurationResult, OptimizeResult, Recommendation, RepetitionStats, SweepConfig, SweepObserver,
    run_repetition, select_recommendation,
};

/// Cloneable cancellation flag.  Checked before every unit.
#[derive(Clone, Debug, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SweepOutcome {
    /// One entry per fully completed fleet size, ascending.
    pub configurations: Vec<ConfigurationResult>,
    pub recommendation: Option<Recommendation>,
    /// `true` when the sweep stopped before the last unit.
    pub aborted:        bool,
}

/// A validated sweep, ready to run.
///
/// # Example
///
/// ```rust,ignore
/// let sweep = WorkforceSweep::new(config, CityMap::chandigarh())?;
/// let stop = sweep.abort_handle();
/// let outcome = sweep.run(&mut NoopSweepObserver);
/// if let Some(rec) = &outcome.recommendation {
///     println!("use {} agents ({})", rec.fleet_size, rec.band);
/// }
/// ```
pub struct WorkforceSweep {
    config: SweepConfig,
    city:   CityMap,
    hub:    GeoPoint,
    abort:  AbortHandle,
}

impl WorkforceSweep {
    /// Normalize and validate `config`.
    pub fn new(config: SweepConfig, city: CityMap) -> OptimizeResult<Self> {
        let config = config.normalized();
        config.validate()?;
        let hub = config.hub.unwrap_or(city.hub);
        Ok(Self { config, city, hub, abort: AbortHandle::new() })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn hub(&self) -> GeoPoint {
        self.hub
    }

    /// A handle that stops this sweep when aborted.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn run<O: SweepObserver>(&self, observer: &mut O) -> SweepOutcome {
        let fleet_sizes = self.config.fleet_sizes();
        tracing::info!(
            min_agents = *fleet_sizes.start(),
            max_agents = *fleet_sizes.end(),
            repetitions = self.config.repetitions,
            max_duration_min = self.config.max_duration_min,
            "workforce sweep started"
        );

        let (configurations, aborted) = self.run_configurations(observer);
        if aborted {
            tracing::info!(completed = configurations.len(), "workforce sweep aborted");
        } else {
            tracing::info!(configurations = configurations.len(), "workforce sweep finished");
        }

        let recommendation = select_recommendation(&configurations);
        let outcome = SweepOutcome { configurations, recommendation, aborted };
        observer.on_sweep_end(&outcome);
        outcome
    }

    #[cfg(not(feature = "parallel"))]
    fn run_configurations<O: SweepObserver>(&self, observer: &mut O) -> (Vec<ConfigurationResult>, bool) {
        let mut configurations = Vec::new();
        for fleet_size in self.config.fleet_sizes() {
            let mut runs = Vec::with_capacity(self.config.repetitions);
            for repetition in 0..self.config.repetitions {
                if self.abort.is_aborted() {
                    return (configurations, true);
                }
                let stats = run_repetition(&self.config, &self.city, self.hub, fleet_size, repetition);
                observer.on_unit_done(&stats);
                runs.push(stats);
            }
            self.record(&runs, observer, &mut configurations);
        }
        (configurations, false)
    }

    /// Units run on Rayon's pool; hooks fire afterwards in sweep order.
    /// Units that find the sweep aborted are skipped and the first fleet
    /// size missing a repetition ends the outcome.
    #[cfg(feature = "parallel")]
    fn run_configurations<O: SweepObserver>(&self, observer: &mut O) -> (Vec<ConfigurationResult>, bool) {
        use rayon::prelude::*;

        let reps = self.config.repetitions;
        let units: Vec<(usize, usize)> = self
            .config
            .fleet_sizes()
            .flat_map(|n| (0..reps).map(move |r| (n, r)))
            .collect();

        let done: Vec<Option<RepetitionStats>> = units
            .par_iter()
            .map(|&(fleet_size, repetition)| {
                (!self.abort.is_aborted())
                    .then(|| run_repetition(&self.config, &self.city, self.hub, fleet_size, repetition))
            })
            .collect();

        let mut configurations = Vec::new();
        for chunk in done.chunks(reps) {
            let Some(runs) = chunk.iter().cloned().collect::<Option<Vec<RepetitionStats>>>() else {
                return (configurations, true);
            };
            for stats in &runs {
                observer.on_unit_done(stats);
            }
            self.record(&runs, observer, &mut configurations);
        }
        (configurations, false)
    }

    fn record<O: SweepObserver>(
        &self,
        runs:           &[RepetitionStats],
        observer:       &mut O,
        configurations: &mut Vec<ConfigurationResult>,
    ) {
        let Some(result) = ConfigurationResult::aggregate(runs, &self.config.parameters.cost_rates()) else {
            return;
        };
        tracing::debug!(
            fleet_size = result.fleet_size,
            generated = result.avg_generated,
            delivered = result.avg_delivered,
            sla_pct = result.sla_pct,
            utilization_pct = ?result.utilization_pct,
            cost_per_order = ?result.cost_per_order,
            "configuration evaluated"
        );
        observer.on_configuration_done(&result);
        configurations.push(result);
    }
}
