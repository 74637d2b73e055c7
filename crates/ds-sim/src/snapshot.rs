//! Immutable views of a running world.
//!
//! [`WorldSnapshot`] is the live-map view (only what is on the road right
//! now).  [`RunReport`] is the export view: parameters, raw statistics,
//! derived metrics, one row per agent and one row per order ever placed.

use ds_core::{AgentId, GeoPoint, OrderId, Tick};
use ds_fleet::{AgentStatus, OrderStatus, RoutePlanner};

use crate::{DerivedMetrics, RunStatistics, SimulationParameters, SimulationWorld};

// ── WorldSnapshot ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub id:                AgentId,
    pub location:          GeoPoint,
    pub status:            AgentStatus,
    pub assigned_order:    Option<OrderId>,
    pub eta_remaining_min: Option<f64>,
    /// Current trip polyline; empty when available.
    pub route:             Vec<GeoPoint>,
    pub fatigue_factor:    f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderView {
    pub id:       OrderId,
    pub location: GeoPoint,
    pub status:   OrderStatus,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub now:            Tick,
    pub traffic_factor: f64,
    pub agents:         Vec<AgentView>,
    /// Orders in the working set.
    pub orders:         Vec<OrderView>,
}

impl WorldSnapshot {
    pub fn capture<P: RoutePlanner>(world: &SimulationWorld<P>) -> Self {
        let now = world.now();
        let agents = world
            .agents
            .iter()
            .map(|a| AgentView {
                id:                a.id,
                location:          a.location,
                status:            a.status,
                assigned_order:    a.assigned_order,
                eta_remaining_min: a.eta_remaining(now),
                route:             a.route.clone(),
                fatigue_factor:    a.fatigue_factor,
            })
            .collect();
        let orders = world
            .orders
            .active()
            .map(|o| OrderView { id: o.id, location: o.location, status: o.status })
            .collect();
        Self { now, traffic_factor: world.traffic.factor(), agents, orders }
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSummary {
    pub id:                   AgentId,
    pub base_speed_kmph:      f64,
    pub fatigue_factor:       f64,
    pub status:               AgentStatus,
    pub deliveries_made:      u32,
    pub distance_traveled_km: f64,
    pub busy_min:             u64,
    pub idle_min:             u64,
    pub travel_min:           f64,
    pub handling_min:         f64,
    pub utilization_pct:      Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRecord {
    pub id:                OrderId,
    pub location:          GeoPoint,
    pub status:            OrderStatus,
    pub assigned_agent:    Option<AgentId>,
    pub time_placed:       Tick,
    pub assignment_time:   Option<Tick>,
    pub wait_min:          Option<u64>,
    pub delivery_time:     Option<f64>,
    pub delivery_duration: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub now:        Tick,
    pub parameters: SimulationParameters,
    pub statistics: RunStatistics,
    pub metrics:    DerivedMetrics,
    pub agents:     Vec<AgentSummary>,
    pub orders:     Vec<OrderRecord>,
}

impl RunReport {
    pub fn build<P: RoutePlanner>(world: &SimulationWorld<P>, parameters: &SimulationParameters) -> Self {
        let agents = world
            .agents
            .iter()
            .map(|a| AgentSummary {
                id:                   a.id,
                base_speed_kmph:      a.base_speed_kmph,
                fatigue_factor:       a.fatigue_factor,
                status:               a.status,
                deliveries_made:      a.deliveries_made,
                distance_traveled_km: a.distance_traveled_km,
                busy_min:             a.busy_time,
                idle_min:             a.time_spent_idle,
                travel_min:           a.time_spent_traveling,
                handling_min:         a.time_spent_handling,
                utilization_pct:      a.utilization_pct(),
            })
            .collect();
        let orders = world
            .orders
            .log()
            .iter()
            .map(|o| OrderRecord {
                id:                o.id,
                location:          o.location,
                status:            o.status,
                assigned_agent:    o.assigned_agent,
                time_placed:       o.time_placed,
                assignment_time:   o.assignment_time,
                wait_min:          o.wait_time(),
                delivery_time:     o.delivery_time,
                delivery_duration: o.delivery_duration(),
            })
            .collect();

        Self {
            now: world.now(),
            parameters: parameters.clone(),
            statistics: world.stats.clone(),
            metrics: DerivedMetrics::compute(&world.stats, &world.agents, parameters),
            agents,
            orders,
        }
    }
}
