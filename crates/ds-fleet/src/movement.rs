//! Movement & leg engine.
//!
//! # Movement model (continuous within a tick)
//!
//! Each tick gives every busy agent one simulated minute of budget, spent in
//! order on whatever the agent is doing:
//!
//! ```text
//! ToStore     ─ travel legs at effective_speed × traffic ─▶ AtStore
//! AtStore     ─ handling until handling_time reached ───▶ ToCustomer (hub → customer route)
//! ToCustomer  ─ travel legs ─────────────────────────────▶ delivered, agent Available
//! ```
//!
//! Budget left over from one phase carries into the next within the same
//! tick, so arrival and delivery instants are exact fractions of a minute.
//! Legs shorter than [`DEGENERATE_LEG_KM`] complete without using budget.
//!
//! The tick processed under `now = Tick(n)` covers the minute `(n-1, n]`;
//! an agent assigned at the end of tick `n-1` starts moving at `n-1`.
//!
//! Inconsistent state (assigned order missing or not ours, route too short,
//! illegal order transition) force-resets the agent to `Available` and is
//! reported as [`MoveEvent::Orphaned`].

use ds_core::time::MINUTES_PER_TICK;
use ds_core::{AgentId, GeoPoint, OrderId, SimRng, Tick};

use crate::fatigue::FatigueModel;
use crate::route::RoutePlanner;
use crate::{Agent, AgentStatus, FleetError, OrderBook, OrderStatus};

/// Legs shorter than this many km are treated as already travelled.
pub const DEGENERATE_LEG_KM: f64 = 0.001;

/// Per-tick inputs shared by every agent.
#[derive(Copy, Clone, Debug)]
pub struct MoveContext {
    /// Tick being processed; the minute `(now - 1, now]`.
    pub now:               Tick,
    pub hub:               GeoPoint,
    pub traffic_factor:    f64,
    pub handling_time_min: f64,
}

/// Notable things that happened to an agent during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum MoveEvent {
    ArrivedAtStore {
        agent: AgentId,
        order: OrderId,
    },
    DepartedStore {
        agent: AgentId,
        order: OrderId,
    },
    Delivered {
        agent:        AgentId,
        order:        OrderId,
        /// Exact delivery instant, minutes.
        delivered_at: f64,
        duration_min: f64,
    },
    Orphaned {
        agent:  AgentId,
        order:  Option<OrderId>,
        reason: String,
    },
}

/// What one agent contributed to the run totals this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AgentStep {
    /// Agent started the tick busy.
    pub busy:         bool,
    pub distance_km:  f64,
    pub travel_min:   f64,
    pub handling_min: f64,
}

/// Advances agents along their routes.
///
/// # Type parameter
///
/// `P` builds the hub → customer route when an agent leaves the store.
pub struct MovementEngine<P: RoutePlanner> {
    pub planner: P,
    pub fatigue: FatigueModel,
}

impl<P: RoutePlanner> MovementEngine<P> {
    pub fn new(planner: P, fatigue: FatigueModel) -> Self {
        Self { planner, fatigue }
    }

    /// Run one tick for one agent: time accounting, fatigue, then movement.
    pub fn step_agent(
        &self,
        agent:  &mut Agent,
        orders: &mut OrderBook,
        ctx:    &MoveContext,
        rng:    &mut SimRng,
        events: &mut Vec<MoveEvent>,
    ) -> AgentStep {
        let mut step = AgentStep { busy: !agent.is_available(), ..AgentStep::default() };

        agent.total_time += 1;
        if step.busy {
            agent.busy_time += 1;
            agent.time_continuously_active += 1;
        } else {
            agent.time_spent_idle += 1;
        }

        self.fatigue.update(agent, ctx.now);

        if step.busy {
            if let Err(reason) = self.advance(agent, orders, ctx, rng, &mut step, events) {
                self.recover_orphan(agent, ctx.now, reason, events);
            }
        }

        agent.distance_traveled_km += step.distance_km;
        agent.time_spent_traveling += step.travel_min;
        agent.time_spent_handling += step.handling_min;
        step
    }

    /// Spend this tick's minute budget.  `Err` carries an orphan reason.
    fn advance(
        &self,
        agent:  &mut Agent,
        orders: &mut OrderBook,
        ctx:    &MoveContext,
        rng:    &mut SimRng,
        step:   &mut AgentStep,
        events: &mut Vec<MoveEvent>,
    ) -> Result<(), String> {
        let km_per_min = agent.effective_speed_kmph() * ctx.traffic_factor / 60.0;
        let tick_start = ctx.now.minutes() - MINUTES_PER_TICK;
        let mut budget = MINUTES_PER_TICK;

        while !agent.is_available() {
            match agent.status {
                AgentStatus::AtStore => {
                    let need = (ctx.handling_time_min - agent.handling_elapsed).max(0.0);
                    if need > budget {
                        agent.handling_elapsed += budget;
                        step.handling_min += budget;
                        return Ok(());
                    }
                    agent.handling_elapsed += need;
                    step.handling_min += need;
                    budget -= need;
                    self.depart_store(agent, orders, ctx, rng, events)?;
                }

                AgentStatus::ToStore | AgentStatus::ToCustomer => {
                    if agent.route.len() < 2 {
                        return Err(format!("route has {} point(s)", agent.route.len()));
                    }
                    if agent.leg_index + 1 >= agent.route.len() {
                        self.arrive(agent, orders, ctx, tick_start + (MINUTES_PER_TICK - budget), events)?;
                        continue;
                    }
                    if budget <= 0.0 {
                        return Ok(());
                    }

                    let from = agent.route[agent.leg_index];
                    let to = agent.route[agent.leg_index + 1];
                    let leg_km = from.distance_km(to);

                    if leg_km < DEGENERATE_LEG_KM {
                        finish_leg(agent, to);
                        continue;
                    }

                    let remaining_km = leg_km * (1.0 - agent.leg_progress);
                    let reach_km = km_per_min * budget;
                    if km_per_min > 0.0 && reach_km >= remaining_km {
                        let used = remaining_km / km_per_min;
                        step.distance_km += remaining_km;
                        step.travel_min += used;
                        budget -= used;
                        finish_leg(agent, to);
                    } else {
                        agent.leg_progress += reach_km / leg_km;
                        agent.location = from.lerp(to, agent.leg_progress);
                        step.distance_km += reach_km;
                        step.travel_min += budget;
                        return Ok(());
                    }
                }

                AgentStatus::Available => break,
            }
        }
        Ok(())
    }

    /// Final leg done: hub arrival or delivery.
    fn arrive(
        &self,
        agent:  &mut Agent,
        orders: &mut OrderBook,
        ctx:    &MoveContext,
        at:     f64,
        events: &mut Vec<MoveEvent>,
    ) -> Result<(), String> {
        let order_id = owned_order(agent, orders)?;
        let order = orders.get_mut(order_id).ok_or_else(|| FleetError::UnknownOrder(order_id).to_string())?;

        match agent.status {
            AgentStatus::ToStore => {
                order.advance(OrderStatus::AtStoreWithAgent).map_err(|e| e.to_string())?;
                agent.status = AgentStatus::AtStore;
                agent.handling_elapsed = 0.0;
                events.push(MoveEvent::ArrivedAtStore { agent: agent.id, order: order_id });
            }
            AgentStatus::ToCustomer => {
                let duration_min = order.deliver(at).map_err(|e| e.to_string())?;
                agent.release(ctx.now);
                self.fatigue.on_available(agent, ctx.now);
                tracing::debug!(agent = %agent.id, order = %order_id, at, duration_min, "order delivered");
                events.push(MoveEvent::Delivered { agent: agent.id, order: order_id, delivered_at: at, duration_min });
            }
            AgentStatus::AtStore | AgentStatus::Available => {}
        }
        Ok(())
    }

    /// Handling done: head out with a fresh hub → customer route.
    fn depart_store(
        &self,
        agent:  &mut Agent,
        orders: &mut OrderBook,
        ctx:    &MoveContext,
        rng:    &mut SimRng,
        events: &mut Vec<MoveEvent>,
    ) -> Result<(), String> {
        let order_id = owned_order(agent, orders)?;
        let order = orders.get_mut(order_id).ok_or_else(|| FleetError::UnknownOrder(order_id).to_string())?;
        order.advance(OrderStatus::OutForDelivery).map_err(|e| e.to_string())?;
        let route = self.planner.plan(ctx.hub, order.location, rng);
        agent.start_trip(AgentStatus::ToCustomer, route);
        events.push(MoveEvent::DepartedStore { agent: agent.id, order: order_id });
        Ok(())
    }

    fn recover_orphan(&self, agent: &mut Agent, now: Tick, reason: String, events: &mut Vec<MoveEvent>) {
        let order = agent.assigned_order;
        tracing::warn!(agent = %agent.id, ?order, %reason, "orphaned agent reset to available");
        agent.force_reset(now);
        events.push(MoveEvent::Orphaned { agent: agent.id, order, reason });
    }
}

/// Snap to the end of the current leg and move on to the next one.
#[inline]
fn finish_leg(agent: &mut Agent, end: GeoPoint) {
    agent.location = end;
    agent.leg_index += 1;
    agent.leg_progress = 0.0;
}

/// The agent's order id, provided the order exists and is assigned to it.
fn owned_order(agent: &Agent, orders: &OrderBook) -> Result<OrderId, String> {
    let id = agent.assigned_order.ok_or_else(|| "no assigned order".to_owned())?;
    let order = orders.get(id).ok_or_else(|| FleetError::UnknownOrder(id).to_string())?;
    if order.assigned_agent != Some(agent.id) {
        return Err(format!("{id} belongs to {:?}", order.assigned_agent));
    }
    Ok(id)
}
