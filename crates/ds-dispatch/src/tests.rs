//! Unit tests for ds-dispatch.

use ds_core::{AgentId, GeoPoint, OrderId, SimRng, Tick};
use ds_fleet::{Agent, AgentStatus, OrderBook, OrderStatus};

use crate::{
    DirectPlanner, MoveContext, WaypointPlanner, assign_pending_orders, best_agent_for, estimate_eta,
    eta_from_legs,
};

const HUB: GeoPoint = GeoPoint::new(30.7333, 76.7794);

fn ctx(now: u64) -> MoveContext {
    MoveContext { now: Tick(now), hub: HUB, traffic_factor: 1.0, handling_time_min: 5.0 }
}

fn agent_at(id: u32, lat_off: f64, speed: f64) -> Agent {
    Agent::new(AgentId(id), GeoPoint::new(HUB.lat + lat_off, HUB.lng), speed, Tick(0))
}

// ── ETA ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod eta {
    use super::*;

    #[test]
    fn reference_value() {
        assert_eq!(eta_from_legs(2.0, 3.0, 20.0, 1.0, 5.0), 20.0);
    }

    #[test]
    fn geodesic_form_matches_legs() {
        let agent = GeoPoint::new(30.70, 76.75);
        let order = GeoPoint::new(30.76, 76.80);
        let eta = estimate_eta(agent, 25.0, order, HUB, 1.2, 4.0);
        let expected = eta_from_legs(agent.distance_km(HUB), HUB.distance_km(order), 25.0, 1.2, 4.0);
        assert!((eta - expected).abs() < 1e-12);
    }

    #[test]
    fn agent_at_hub_pays_only_outbound_leg() {
        let order = GeoPoint::new(HUB.lat + 0.01, HUB.lng);
        let eta = estimate_eta(HUB, 30.0, order, HUB, 1.0, 0.0);
        assert!((eta - HUB.distance_km(order) * 2.0).abs() < 1e-12);
    }

    #[test]
    fn heavier_traffic_is_slower() {
        let order = GeoPoint::new(HUB.lat + 0.02, HUB.lng);
        assert!(estimate_eta(HUB, 20.0, order, HUB, 0.7, 5.0) > estimate_eta(HUB, 20.0, order, HUB, 1.3, 5.0));
    }

    #[test]
    fn zero_speed_never_wins() {
        assert!(eta_from_legs(1.0, 1.0, 0.0, 1.0, 5.0).is_infinite());
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment {
    use super::*;

    #[test]
    fn nearest_agent_wins() {
        let agents = vec![agent_at(0, 0.05, 20.0), agent_at(1, 0.01, 20.0), agent_at(2, 0.03, 20.0)];
        let order = GeoPoint::new(HUB.lat - 0.01, HUB.lng);
        let (idx, _) = best_agent_for(&agents, order, &ctx(0)).unwrap();
        assert_eq!(agents[idx].id, AgentId(1));
    }

    #[test]
    fn faster_agent_can_beat_nearer_one() {
        let agents = vec![agent_at(0, 0.010, 10.0), agent_at(1, 0.012, 40.0)];
        let order = GeoPoint::new(HUB.lat - 0.01, HUB.lng);
        let (idx, _) = best_agent_for(&agents, order, &ctx(0)).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn equal_eta_goes_to_lowest_id() {
        // Stored out of id order on purpose.
        let agents = vec![agent_at(4, 0.0, 25.0), agent_at(2, 0.0, 25.0), agent_at(7, 0.0, 25.0)];
        let order = GeoPoint::new(HUB.lat + 0.01, HUB.lng);
        let (idx, _) = best_agent_for(&agents, order, &ctx(0)).unwrap();
        assert_eq!(agents[idx].id, AgentId(2));
    }

    #[test]
    fn busy_agents_are_skipped() {
        let mut agents = vec![agent_at(0, 0.0, 25.0), agent_at(1, 0.04, 25.0)];
        agents[0].assign(OrderId(99), vec![HUB, HUB], Tick(0), 1.0);
        let order = GeoPoint::new(HUB.lat + 0.01, HUB.lng);
        let (idx, _) = best_agent_for(&agents, order, &ctx(0)).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn oldest_orders_first_and_one_order_per_agent() {
        let mut book = OrderBook::new();
        let o0 = book.place(GeoPoint::new(HUB.lat + 0.01, HUB.lng), Tick(0));
        let o1 = book.place(GeoPoint::new(HUB.lat + 0.02, HUB.lng), Tick(1));
        let o2 = book.place(GeoPoint::new(HUB.lat + 0.03, HUB.lng), Tick(2));
        let mut agents = vec![agent_at(0, 0.0, 25.0), agent_at(1, 0.0, 25.0)];
        let mut rng = SimRng::new(5);

        let out = assign_pending_orders(&mut book, &mut agents, &ctx(4), &DirectPlanner, &mut rng);

        assert_eq!(out.len(), 2);
        assert_eq!((out[0].order, out[0].agent, out[0].wait_min), (o0, AgentId(0), 4));
        assert_eq!((out[1].order, out[1].agent, out[1].wait_min), (o1, AgentId(1), 3));
        assert_eq!(book.get(o2).unwrap().status, OrderStatus::Pending);
        assert_eq!(book.pending_ids(), vec![o2]);
        for a in &agents {
            assert_eq!(a.status, AgentStatus::ToStore);
            assert!(a.invariant_holds());
            assert_eq!(a.route, vec![HUB, HUB]);
        }
        let placed = book.get(o0).unwrap();
        assert_eq!(placed.status, OrderStatus::AssignedToAgentGoingToStore);
        assert_eq!(placed.assigned_agent, Some(AgentId(0)));
        assert_eq!(placed.eta_min, Some(out[0].eta_min));
    }

    #[test]
    fn no_agents_leaves_orders_pending() {
        let mut book = OrderBook::new();
        book.place(HUB, Tick(0));
        let mut agents: Vec<Agent> = Vec::new();
        let mut rng = SimRng::new(5);
        let out = assign_pending_orders(&mut book, &mut agents, &ctx(1), &DirectPlanner, &mut rng);
        assert!(out.is_empty());
        assert_eq!(book.pending_count(), 1);
    }

    #[test]
    fn assignment_resets_continuous_activity() {
        let mut book = OrderBook::new();
        book.place(GeoPoint::new(HUB.lat + 0.01, HUB.lng), Tick(0));
        let mut agents = vec![agent_at(0, 0.02, 25.0)];
        agents[0].time_continuously_active = 40;
        let mut rng = SimRng::new(5);
        assign_pending_orders(&mut book, &mut agents, &ctx(1), &DirectPlanner, &mut rng);
        assert_eq!(agents[0].time_continuously_active, 0);
        assert_eq!(agents[0].assigned_at, Some(Tick(1)));
    }

    #[test]
    fn waypoint_planner_bends_route_to_hub() {
        let mut book = OrderBook::new();
        book.place(HUB, Tick(0));
        let start = GeoPoint::new(HUB.lat + 0.03, HUB.lng + 0.02);
        let mut agents = vec![Agent::new(AgentId(0), start, 25.0, Tick(0))];
        let mut rng = SimRng::new(5);
        assign_pending_orders(&mut book, &mut agents, &ctx(1), &WaypointPlanner::new(2), &mut rng);
        let route = &agents[0].route;
        assert_eq!(route.len(), 4);
        assert_eq!(route[0], start);
        assert_eq!(route[3], HUB);
    }
}
