//! Delivery agents.

use std::fmt;

use ds_core::{AgentId, GeoPoint, OrderId, Tick};

// ── AgentStatus ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgentStatus {
    #[default]
    Available,
    /// Heading to the hub to pick up the assigned order.
    ToStore,
    /// At the hub, handling the order.
    AtStore,
    /// Carrying the order to the customer.
    ToCustomer,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Available => "available",
            AgentStatus::ToStore => "to_store",
            AgentStatus::AtStore => "at_store",
            AgentStatus::ToCustomer => "to_customer",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One delivery rider.
///
/// Invariant: `status == Available` ⟺ `assigned_order.is_none()` ⟺
/// `route.is_empty()`.  Only [`Agent::assign`], [`Agent::release`] and
/// [`Agent::force_reset`] change the status across that boundary.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:              AgentId,
    pub location:        GeoPoint,
    pub base_speed_kmph: f64,
    /// Speed multiplier in `[MIN_FATIGUE_FACTOR, 1.0]`; 1.0 is fully rested.
    pub fatigue_factor:  f64,
    pub status:          AgentStatus,
    pub assigned_order:  Option<OrderId>,

    // ── Route ─────────────────────────────────────────────────────────────
    /// Polyline of the current trip, endpoints included.
    pub route:            Vec<GeoPoint>,
    pub leg_index:        usize,
    /// Fraction of the current leg already covered, in `[0, 1)`.
    pub leg_progress:     f64,
    /// Minutes spent handling the current order at the hub.
    pub handling_elapsed: f64,
    pub assigned_at:      Option<Tick>,
    /// ETA estimated at assignment, minutes.
    pub assigned_eta_min: f64,

    // ── Fatigue bookkeeping ───────────────────────────────────────────────
    pub consecutive_deliveries:   u32,
    pub time_continuously_active: u64,
    pub time_became_available_at: Tick,

    // ── Accumulators (minutes / km) ───────────────────────────────────────
    pub total_time:           u64,
    pub busy_time:            u64,
    pub time_spent_idle:      u64,
    pub time_spent_traveling: f64,
    pub time_spent_handling:  f64,
    pub distance_traveled_km: f64,
    pub deliveries_made:      u32,
}

impl Agent {
    pub fn new(id: AgentId, location: GeoPoint, base_speed_kmph: f64, now: Tick) -> Self {
        Self {
            id,
            location,
            base_speed_kmph,
            fatigue_factor: 1.0,
            status: AgentStatus::Available,
            assigned_order: None,
            route: Vec::new(),
            leg_index: 0,
            leg_progress: 0.0,
            handling_elapsed: 0.0,
            assigned_at: None,
            assigned_eta_min: 0.0,
            consecutive_deliveries: 0,
            time_continuously_active: 0,
            time_became_available_at: now,
            total_time: 0,
            busy_time: 0,
            time_spent_idle: 0,
            time_spent_traveling: 0.0,
            time_spent_handling: 0.0,
            distance_traveled_km: 0.0,
            deliveries_made: 0,
        }
    }

    /// Base speed scaled by fatigue, km/h.  Never cached.
    #[inline]
    pub fn effective_speed_kmph(&self) -> f64 {
        self.base_speed_kmph * self.fatigue_factor
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status == AgentStatus::Available
    }

    /// Take on `order`, heading to the hub along `route`.
    pub fn assign(&mut self, order: OrderId, route: Vec<GeoPoint>, now: Tick, eta_min: f64) {
        self.status = AgentStatus::ToStore;
        self.assigned_order = Some(order);
        self.route = route;
        self.leg_index = 0;
        self.leg_progress = 0.0;
        self.handling_elapsed = 0.0;
        self.assigned_at = Some(now);
        self.assigned_eta_min = eta_min;
        self.time_continuously_active = 0;
    }

    /// Start a new trip on `route` with the given status.
    pub fn start_trip(&mut self, status: AgentStatus, route: Vec<GeoPoint>) {
        self.status = status;
        self.route = route;
        self.leg_index = 0;
        self.leg_progress = 0.0;
    }

    /// Back to `Available` after a completed delivery.
    pub fn release(&mut self, now: Tick) {
        self.clear_assignment(now);
        self.deliveries_made += 1;
        self.consecutive_deliveries += 1;
    }

    /// Back to `Available` without crediting a delivery.  Used to recover
    /// from an assignment that no longer makes sense.
    pub fn force_reset(&mut self, now: Tick) {
        self.clear_assignment(now);
    }

    /// Minutes of the assignment-time ETA still outstanding at `now`.
    pub fn eta_remaining(&self, now: Tick) -> Option<f64> {
        let at = self.assigned_at?;
        if self.is_available() {
            return None;
        }
        Some((self.assigned_eta_min - now.since(at) as f64).max(0.0))
    }

    /// `true` when the availability invariant holds.
    pub fn invariant_holds(&self) -> bool {
        let available = self.is_available();
        available == self.assigned_order.is_none() && available == self.route.is_empty()
    }

    /// Busy share of this agent's time, percent.
    pub fn utilization_pct(&self) -> Option<f64> {
        (self.total_time > 0).then(|| self.busy_time as f64 / self.total_time as f64 * 100.0)
    }

    fn clear_assignment(&mut self, now: Tick) {
        self.status = AgentStatus::Available;
        self.assigned_order = None;
        self.route.clear();
        self.leg_index = 0;
        self.leg_progress = 0.0;
        self.handling_elapsed = 0.0;
        self.assigned_at = None;
        self.assigned_eta_min = 0.0;
        self.time_became_available_at = now;
        self.time_continuously_active = 0;
    }
}
