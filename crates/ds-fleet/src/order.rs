//! Orders and the per-run order book.

use std::fmt;

use ds_core::{AgentId, GeoPoint, OrderId, Tick};

use crate::{FleetError, FleetResult};

// ── OrderStatus ───────────────────────────────────────────────────────────────

/// Lifecycle of an order.  Strictly linear: each status has exactly one
/// successor and none can be skipped or revisited.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    AssignedToAgentGoingToStore,
    AtStoreWithAgent,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// The only status this one may move to.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::AssignedToAgentGoingToStore),
            OrderStatus::AssignedToAgentGoingToStore => Some(OrderStatus::AtStoreWithAgent),
            OrderStatus::AtStoreWithAgent => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::AssignedToAgentGoingToStore => "assigned_to_agent_going_to_store",
            OrderStatus::AtStoreWithAgent => "at_store_with_agent",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Order ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub id:              OrderId,
    pub location:        GeoPoint,
    pub status:          OrderStatus,
    pub assigned_agent:  Option<AgentId>,
    pub time_placed:     Tick,
    pub assignment_time: Option<Tick>,
    /// ETA estimated by dispatch, minutes.
    pub eta_min:         Option<f64>,
    /// Exact delivery instant on the minute axis.
    pub delivery_time:   Option<f64>,
}

impl Order {
    pub fn new(id: OrderId, location: GeoPoint, time_placed: Tick) -> Self {
        Self {
            id,
            location,
            status: OrderStatus::Pending,
            assigned_agent: None,
            time_placed,
            assignment_time: None,
            eta_min: None,
            delivery_time: None,
        }
    }

    /// Move to the successor status, failing on any other target.
    pub fn advance(&mut self, to: OrderStatus) -> FleetResult<()> {
        if self.status.successor() != Some(to) {
            return Err(FleetError::InvalidTransition { order: self.id, from: self.status, to });
        }
        self.status = to;
        Ok(())
    }

    /// Attach `agent`.  An order is assigned exactly once.
    ///
    /// Returns the wait time (assignment − placement), minutes.
    pub fn assign(&mut self, agent: AgentId, now: Tick, eta_min: f64) -> FleetResult<u64> {
        if let Some(existing) = self.assigned_agent {
            return Err(FleetError::AlreadyAssigned { order: self.id, agent: existing });
        }
        self.advance(OrderStatus::AssignedToAgentGoingToStore)?;
        self.assigned_agent = Some(agent);
        self.assignment_time = Some(now);
        self.eta_min = Some(eta_min);
        Ok(now.since(self.time_placed))
    }

    /// Mark delivered at instant `at`; returns the delivery duration.
    pub fn deliver(&mut self, at: f64) -> FleetResult<f64> {
        self.advance(OrderStatus::Delivered)?;
        self.delivery_time = Some(at);
        Ok(self.delivery_duration().unwrap_or(0.0))
    }

    /// `delivery_time − time_placed`, once delivered.
    pub fn delivery_duration(&self) -> Option<f64> {
        self.delivery_time.map(|t| t - self.time_placed.minutes())
    }

    pub fn wait_time(&self) -> Option<u64> {
        self.assignment_time.map(|t| t.since(self.time_placed))
    }

    #[inline]
    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }
}

// ── OrderBook ─────────────────────────────────────────────────────────────────

/// Every order of a run, indexed by `OrderId`, plus the active working set.
///
/// Ids are allocated densely from 0, so `orders[id.index()]` is the order.
/// Delivered orders leave the active set on [`OrderBook::prune_delivered`]
/// but stay in the log.
#[derive(Clone, Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    /// Ids of undelivered (or not yet pruned) orders, ascending.
    active: Vec<OrderId>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending order at `location`, placed at `now`.
    pub fn place(&mut self, location: GeoPoint, now: Tick) -> OrderId {
        let id = OrderId(self.orders.len() as u32);
        self.orders.push(Order::new(id, location, now));
        self.active.push(id);
        id
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id.index())
    }

    /// Orders still in the working set, in creation order.
    pub fn active(&self) -> impl Iterator<Item = &Order> + '_ {
        self.active.iter().filter_map(|id| self.orders.get(id.index()))
    }

    /// Pending orders in creation order.
    pub fn pending_ids(&self) -> Vec<OrderId> {
        self.active()
            .filter(|o| o.status == OrderStatus::Pending)
            .map(|o| o.id)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.active().filter(|o| o.status == OrderStatus::Pending).count()
    }

    /// Drop delivered orders from the working set; returns how many left.
    pub fn prune_delivered(&mut self) -> usize {
        let before = self.active.len();
        let orders = &self.orders;
        self.active
            .retain(|id| orders.get(id.index()).is_some_and(|o| !o.is_delivered()));
        before - self.active.len()
    }

    /// Full per-run log, delivered orders included.
    #[inline]
    pub fn log(&self) -> &[Order] {
        &self.orders
    }

    #[inline]
    pub fn generated(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// `true` when every order ever placed has been delivered.
    pub fn all_delivered(&self) -> bool {
        self.orders.iter().all(Order::is_delivered)
    }
}
