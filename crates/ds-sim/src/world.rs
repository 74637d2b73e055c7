//! The simulation world and its step functions.
//!
//! `SimulationWorld` is the single mutable aggregate both drivers advance.
//! It holds no policy about *when* orders appear: the interactive driver
//! feeds it from an [`OrderPattern`] with a per-minute probability, the
//! batch sweep from its own demand mode.  Everything else (movement,
//! dispatch, pruning and accounting) lives here once.
//!
//! # Step order (one simulated minute)
//!
//! ```text
//! advance_clock   → t += 1, traffic resample
//! place_order     → zero or more new pending orders (driver-specific)
//! step_movement   → every agent spends one minute of budget
//! dispatch        → pending orders, oldest first, to the best free agent
//! prune           → delivered orders leave the working set
//! ```

use ds_core::{AgentId, GeoPoint, OrderId, SimClock, SimRng, Tick};
use ds_demand::{OrderLocationSampler, OrderPattern};
use ds_dispatch::{Assignment, assign_pending_orders};
use ds_fleet::{Agent, FatigueModel, MoveContext, MoveEvent, MovementEngine, OrderBook, RoutePlanner};

use crate::{RunStatistics, TrafficModel};

/// Fleet and physics settings for one world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub hub:               GeoPoint,
    pub num_agents:        usize,
    pub min_speed_kmph:    f64,
    pub max_speed_kmph:    f64,
    /// Half-width of the spawn square around the hub, degrees.  0 spawns
    /// every agent exactly at the hub.
    pub spawn_jitter_deg:  f64,
    pub handling_time_min: f64,
    pub traffic:           TrafficModel,
}

/// What one movement pass produced.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MovementSummary {
    pub delivered: usize,
    pub orphaned:  usize,
}

pub struct SimulationWorld<P: RoutePlanner> {
    pub clock:             SimClock,
    pub hub:               GeoPoint,
    /// Indexed by `AgentId`.
    pub agents:            Vec<Agent>,
    pub orders:            OrderBook,
    pub stats:             RunStatistics,
    pub traffic:           TrafficModel,
    pub engine:            MovementEngine<P>,
    pub handling_time_min: f64,
    pub rng:               SimRng,
    /// Events of the most recent movement pass.
    pub events:            Vec<MoveEvent>,
}

impl<P: RoutePlanner> SimulationWorld<P> {
    /// Spawn the fleet.  Base speeds are uniform in the configured range;
    /// an inverted range uses the minimum speed.
    pub fn new(config: &WorldConfig, planner: P, mut rng: SimRng) -> Self {
        let (lo, hi) = if config.min_speed_kmph > config.max_speed_kmph {
            (config.min_speed_kmph, config.min_speed_kmph)
        } else {
            (config.min_speed_kmph, config.max_speed_kmph)
        };

        let agents = (0..config.num_agents)
            .map(|i| {
                let speed = rng.uniform(lo, hi);
                let location = if config.spawn_jitter_deg > 0.0 {
                    config.hub.offset(rng.symmetric(config.spawn_jitter_deg), rng.symmetric(config.spawn_jitter_deg))
                } else {
                    config.hub
                };
                Agent::new(AgentId(i as u32), location, speed, Tick::ZERO)
            })
            .collect();

        Self {
            clock: SimClock::new(),
            hub: config.hub,
            agents,
            orders: OrderBook::new(),
            stats: RunStatistics::default(),
            traffic: config.traffic,
            engine: MovementEngine::new(planner, FatigueModel::default()),
            handling_time_min: config.handling_time_min,
            rng,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    pub fn move_context(&self) -> MoveContext {
        MoveContext {
            now:               self.clock.now(),
            hub:               self.hub,
            traffic_factor:    self.traffic.factor(),
            handling_time_min: self.handling_time_min,
        }
    }

    // ── Step functions ────────────────────────────────────────────────────

    /// Move time forward one minute and resample traffic if due.  Returns
    /// the new time and the redrawn traffic factor, if any.
    pub fn advance_clock(&mut self) -> (Tick, Option<f64>) {
        let now = self.clock.advance();
        let resampled = self.traffic.update(now, &mut self.rng);
        (now, resampled)
    }

    /// New pending order at `location`, placed now.
    pub fn place_order(&mut self, location: GeoPoint) -> OrderId {
        self.stats.orders_generated += 1;
        self.orders.place(location, self.clock.now())
    }

    /// With probability `p`, sample a location from `pattern` and place an
    /// order there.  A pattern that resolves to nothing places no order.
    pub fn generate_order(&mut self, sampler: &OrderLocationSampler<'_>, pattern: &OrderPattern, p: f64) -> Option<OrderId> {
        if !self.rng.gen_bool(p) {
            return None;
        }
        match sampler.sample(pattern, self.clock.now(), &mut self.rng) {
            Some(location) => Some(self.place_order(location)),
            None => {
                tracing::trace!(now = %self.clock.now(), "no zone resolved; order skipped");
                None
            }
        }
    }

    /// One minute of movement for every agent, in id order.
    pub fn step_movement(&mut self) -> MovementSummary {
        let ctx = self.move_context();
        self.events.clear();

        for agent in self.agents.iter_mut() {
            let step = self.engine.step_agent(agent, &mut self.orders, &ctx, &mut self.rng, &mut self.events);
            if step.busy {
                self.stats.agent_active_minutes += 1;
            }
            self.stats.total_distance_km += step.distance_km;
            self.stats.total_travel_min += step.travel_min;
            self.stats.total_handling_min += step.handling_min;
        }

        let mut summary = MovementSummary::default();
        for event in &self.events {
            match event {
                MoveEvent::Delivered { duration_min, .. } => {
                    self.stats.record_delivery(*duration_min);
                    summary.delivered += 1;
                }
                MoveEvent::Orphaned { .. } => {
                    self.stats.orphan_recoveries += 1;
                    summary.orphaned += 1;
                }
                MoveEvent::ArrivedAtStore { .. } | MoveEvent::DepartedStore { .. } => {}
            }
        }
        summary
    }

    /// Assign pending orders and record their wait times.
    pub fn dispatch(&mut self) -> Vec<Assignment> {
        let ctx = self.move_context();
        let assignments =
            assign_pending_orders(&mut self.orders, &mut self.agents, &ctx, &self.engine.planner, &mut self.rng);
        for a in &assignments {
            self.stats.record_assignment(a.wait_min);
        }
        assignments
    }

    /// Drop delivered orders from the working set.
    #[inline]
    pub fn prune(&mut self) -> usize {
        self.orders.prune_delivered()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Agents currently carrying an order.
    pub fn active_agents(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_available()).count()
    }

    /// Undelivered orders in the working set.
    pub fn open_orders(&self) -> usize {
        self.orders.active().filter(|o| !o.is_delivered()).count()
    }

    /// Σ busy and Σ total agent-minutes.
    pub fn agent_minutes(&self) -> (u64, u64) {
        self.agents.iter().fold((0, 0), |(b, t), a| (b + a.busy_time, t + a.total_time))
    }
}
