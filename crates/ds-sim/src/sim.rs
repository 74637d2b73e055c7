//! The interactive step-wise driver.

use std::fmt;

use ds_core::{GeoPoint, OrderId, SimRng, Tick};
use ds_demand::{CityMap, DemandProfile, OrderLocationSampler, OrderPattern, ProfileCatalog, ProfileId};
use ds_dispatch::Assignment;
use ds_fleet::WaypointPlanner;

use crate::series::{LiveSeries, SeriesPoint};
use crate::world::WorldConfig;
use crate::{
    ConfigError, DerivedMetrics, NoopObserver, ParamValue, RunReport, RunStatistics, SimError, SimObserver,
    SimResult, SimulationParameters, SimulationWorld, TrafficModel, WorldSnapshot,
};

/// The world type the interactive driver advances.
pub type InteractiveWorld = SimulationWorld<WaypointPlanner>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Paused => "paused",
        })
    }
}

/// What happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub now:               Tick,
    pub traffic_factor:    f64,
    /// New factor when dynamic traffic was redrawn this tick.
    pub traffic_resampled: Option<f64>,
    pub order_generated:   Option<OrderId>,
    pub assignments:       Vec<Assignment>,
    pub delivered:         usize,
    pub orphaned:          usize,
    pub pruned:            usize,
    /// Undelivered orders after the tick.
    pub pending:           usize,
    pub active_agents:     usize,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One long-lived interactive run.
///
/// ```text
///            start()            pause()
///   Idle ───────────▶ Running ─────────▶ Paused
///    ▲                   ▲                  │
///    │ reset()           └──── start() ─────┘
///    └── (from any state)
/// ```
///
/// `tick()` does nothing unless the state is `Running`.  Parameter edits go
/// to the configured set and reach the world at the next reset; `start()`
/// at t = 0 resets first so edits made before starting always apply.
///
/// Create via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation {
    /// Edited by `set_parameter`.
    params:  SimulationParameters,
    /// Snapshot the current world was built from.
    active:  SimulationParameters,
    city:    CityMap,
    catalog: ProfileCatalog,
    hub:     GeoPoint,
    state:   RunState,
    world:   InteractiveWorld,
    pattern: OrderPattern,
    series:  LiveSeries,
}

impl Simulation {
    pub(crate) fn from_parts(
        params:  SimulationParameters,
        city:    CityMap,
        catalog: ProfileCatalog,
        hub:     GeoPoint,
        window:  usize,
    ) -> Self {
        let (world, pattern) = spawn(&params, &catalog, hub);
        Self {
            active: params.clone(),
            params,
            city,
            catalog,
            hub,
            state: RunState::Idle,
            world,
            pattern,
            series: LiveSeries::new(window),
        }
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// Stop and rebuild the world from the configured parameters.
    pub fn reset(&mut self) {
        self.reset_observed(&mut NoopObserver);
    }

    pub fn reset_observed<O: SimObserver>(&mut self, observer: &mut O) {
        self.active = self.params.clone();
        let (world, pattern) = spawn(&self.active, &self.catalog, self.hub);
        self.world = world;
        self.pattern = pattern;
        self.series.clear();
        self.state = RunState::Idle;
        tracing::info!(
            agents = self.active.num_agents,
            profile = %self.active.demand_profile,
            seed = self.active.seed,
            "simulation reset"
        );
        observer.on_reset(&self.world);
    }

    /// Begin or resume.  At t = 0 the world is rebuilt first.
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        if self.world.now() == Tick::ZERO {
            self.reset();
        }
        self.state = RunState::Running;
        tracing::info!(now = %self.world.now(), "simulation started");
    }

    /// Running → Paused.  State is preserved for resumption.
    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
            tracing::info!(now = %self.world.now(), "simulation paused");
        }
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance one simulated minute.  `None` unless running.
    pub fn tick(&mut self) -> Option<TickReport> {
        self.tick_observed(&mut NoopObserver)
    }

    pub fn tick_observed<O: SimObserver>(&mut self, observer: &mut O) -> Option<TickReport> {
        if self.state != RunState::Running {
            return None;
        }

        let (now, traffic_resampled) = self.world.advance_clock();
        observer.on_tick_start(now);

        let sampler = OrderLocationSampler::new(&self.city, self.world.hub);
        let order_generated = self.world.generate_order(&sampler, &self.pattern, self.active.order_probability);

        let movement = self.world.step_movement();
        let assignments = self.world.dispatch();
        let pruned = self.world.prune();

        let pending = self.world.open_orders();
        let active_agents = self.world.active_agents();
        self.series.push(SeriesPoint { time: now, pending, active_agents });

        let report = TickReport {
            now,
            traffic_factor: self.world.traffic.factor(),
            traffic_resampled,
            order_generated,
            assignments,
            delivered: movement.delivered,
            orphaned: movement.orphaned,
            pruned,
            pending,
            active_agents,
        };
        observer.on_tick_end(&report, &self.world);
        Some(report)
    }

    /// Up to `n` ticks; stops early if the driver leaves `Running`.
    /// Returns how many ticks ran.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        let mut ran = 0;
        for _ in 0..n {
            if self.tick_observed(observer).is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Place an order at `location` now and run a dispatch pass.
    pub fn submit_order(&mut self, location: GeoPoint) -> SimResult<OrderId> {
        if !location.is_valid() {
            return Err(SimError::InvalidLocation(location));
        }
        let id = self.world.place_order(location);
        self.world.dispatch();
        Ok(id)
    }

    // ── Configuration ─────────────────────────────────────────────────────

    /// Edit one configured parameter.  Takes effect at the next reset.
    pub fn set_parameter(&mut self, key: &str, value: impl Into<ParamValue>) -> Result<(), ConfigError> {
        let mut next = self.params.clone();
        next.set(key, value)?;
        if let ProfileId::Custom(name) = &next.demand_profile {
            if self.catalog.get(name).is_none() {
                return Err(ConfigError::UnknownProfile(name.clone()));
            }
        }
        self.params = next;
        Ok(())
    }

    /// Add or replace a custom profile.  Runs already using a profile of
    /// that name keep their copy until the next reset.
    pub fn insert_profile(&mut self, profile: DemandProfile) {
        self.catalog.insert(profile);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.world.now()
    }

    /// Configured parameters (including edits not yet applied).
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Parameters the current world runs on.
    pub fn active_params(&self) -> &SimulationParameters {
        &self.active
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn city(&self) -> &CityMap {
        &self.city
    }

    pub fn world(&self) -> &InteractiveWorld {
        &self.world
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.world.stats
    }

    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics::compute(&self.world.stats, &self.world.agents, &self.active)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world)
    }

    pub fn report(&self) -> RunReport {
        RunReport::build(&self.world, &self.active)
    }

    pub fn series(&self) -> &LiveSeries {
        &self.series
    }
}

/// Fresh world and resolved demand pattern for `params`.
fn spawn(params: &SimulationParameters, catalog: &ProfileCatalog, hub: GeoPoint) -> (InteractiveWorld, OrderPattern) {
    let (min_speed, max_speed) = params.speed_range();
    let traffic = if params.dynamic_traffic {
        TrafficModel::dynamic(params.base_traffic_factor)
    } else {
        TrafficModel::fixed(params.base_traffic_factor)
    };
    let config = WorldConfig {
        hub,
        num_agents: params.num_agents,
        min_speed_kmph: min_speed,
        max_speed_kmph: max_speed,
        spawn_jitter_deg: params.spawn_jitter_deg,
        handling_time_min: params.handling_time_min,
        traffic,
    };
    let world = SimulationWorld::new(&config, WaypointPlanner::new(params.route_waypoints), SimRng::new(params.seed));
    (world, params.order_pattern(catalog))
}
