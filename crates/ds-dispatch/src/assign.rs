//! Nearest-available-agent assignment.

use ds_core::{AgentId, GeoPoint, OrderId, SimRng};
use ds_fleet::{Agent, MoveContext, OrderBook, RoutePlanner};

use crate::estimate_eta;

/// One order handed to one agent during a dispatch pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Assignment {
    pub order:    OrderId,
    pub agent:    AgentId,
    pub eta_min:  f64,
    /// Minutes the order waited as pending.
    pub wait_min: u64,
}

/// Index into `agents` of the available agent with the smallest ETA to
/// `order_location`, with ties going to the lowest agent id.
pub fn best_agent_for(agents: &[Agent], order_location: GeoPoint, ctx: &MoveContext) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, agent) in agents.iter().enumerate() {
        if !agent.is_available() {
            continue;
        }
        let eta = estimate_eta(
            agent.location,
            agent.effective_speed_kmph(),
            order_location,
            ctx.hub,
            ctx.traffic_factor,
            ctx.handling_time_min,
        );
        let better = match best {
            None => eta.is_finite(),
            Some((b, b_eta)) => eta < b_eta || (eta == b_eta && agent.id < agents[b].id),
        };
        if better {
            best = Some((idx, eta));
        }
    }
    best
}

/// Assign every pending order, oldest first, to its best available agent.
///
/// The chosen agent heads for the hub along `planner`'s route from its
/// current position.  Orders left without an agent stay pending.
pub fn assign_pending_orders<P: RoutePlanner + ?Sized>(
    orders:  &mut OrderBook,
    agents:  &mut [Agent],
    ctx:     &MoveContext,
    planner: &P,
    rng:     &mut SimRng,
) -> Vec<Assignment> {
    let mut out = Vec::new();

    for order_id in orders.pending_ids() {
        if !agents.iter().any(Agent::is_available) {
            break;
        }
        let Some(order) = orders.get_mut(order_id) else { continue };
        let Some((idx, eta_min)) = best_agent_for(agents, order.location, ctx) else { break };
        let agent = &mut agents[idx];

        let wait_min = match order.assign(agent.id, ctx.now, eta_min) {
            Ok(wait) => wait,
            Err(e) => {
                tracing::warn!(order = %order_id, error = %e, "order could not be assigned");
                continue;
            }
        };
        let route = planner.plan(agent.location, ctx.hub, rng);
        agent.assign(order_id, route, ctx.now, eta_min);

        tracing::debug!(order = %order_id, agent = %agent.id, eta_min, wait_min, "order assigned");
        out.push(Assignment { order: order_id, agent: agent.id, eta_min, wait_min });
    }
    out
}
