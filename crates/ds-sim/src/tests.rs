//! Unit tests for ds-sim.

use ds_core::{AgentId, GeoPoint, SimRng, Tick};
use ds_demand::{DemandProfile, ProfileId, Zone, ZoneShape};
use ds_fleet::{Agent, AgentStatus, OrderStatus};

use crate::{
    ConfigError, DerivedMetrics, LiveSeries, NoopObserver, ParamValue, RunState, RunStatistics, SeriesPoint,
    SimError, SimObserver, Simulation, SimulationBuilder, SimulationParameters, TickReport, TrafficModel,
    InteractiveWorld, std_dev_sample,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One 30 km/h agent exactly at the hub, no random demand, straight routes.
fn single_agent_params() -> SimulationParameters {
    SimulationParameters {
        num_agents: 1,
        agent_min_speed_kmph: 30.0,
        agent_max_speed_kmph: 30.0,
        handling_time_min: 5.0,
        order_probability: 0.0,
        spawn_jitter_deg: 0.0,
        route_waypoints: 0,
        base_traffic_factor: 1.0,
        dynamic_traffic: false,
        ..SimulationParameters::default()
    }
}

fn build(params: SimulationParameters) -> Simulation {
    SimulationBuilder::new().params(params).build().unwrap()
}

fn agent_with_times(id: u32, busy: u64, total: u64) -> Agent {
    let mut a = Agent::new(AgentId(id), GeoPoint::new(30.0, 76.0), 25.0, Tick(0));
    a.busy_time = busy;
    a.total_time = total;
    a
}

// ── Parameters ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use super::*;

    #[test]
    fn defaults() {
        let p = SimulationParameters::default();
        assert_eq!(p.num_agents, 5);
        assert_eq!(p.handling_time_min, 5.0);
        assert_eq!(p.demand_profile, ProfileId::DefaultUniform);
        assert_eq!(p.order_probability, 0.40);
        assert_eq!(p.order_frequency_level(), Some(3));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn set_accepts_in_range_values() {
        let mut p = SimulationParameters::default();
        p.set("num_agents", 12.0).unwrap();
        p.set("dynamic_traffic", true).unwrap();
        p.set("handling_time_min", "7.5").unwrap();
        p.set("demand_profile", "default_focused").unwrap();
        p.set("seed", "18446744073709551615").unwrap();
        assert_eq!(p.num_agents, 12);
        assert!(p.dynamic_traffic);
        assert_eq!(p.handling_time_min, 7.5);
        assert_eq!(p.demand_profile, ProfileId::DefaultFocused);
        assert_eq!(p.seed, u64::MAX);
    }

    #[test]
    fn rejected_edit_leaves_value_intact() {
        let mut p = SimulationParameters::default();
        let err = p.set("num_agents", 0.0).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { key: "num_agents", .. }));
        assert!(p.set("num_agents", 2.5).is_err());
        assert!(p.set("order_probability", 1.5).is_err());
        assert!(p.set("base_traffic_factor", 0.0).is_err());
        assert_eq!(p, SimulationParameters::default());
    }

    #[test]
    fn unknown_key_and_wrong_type() {
        let mut p = SimulationParameters::default();
        assert_eq!(p.set("warp_speed", 1.0), Err(ConfigError::UnknownKey("warp_speed".into())));
        assert!(matches!(p.set("dynamic_traffic", 3.0), Err(ConfigError::WrongType { .. })));
        assert!(matches!(p.set("cost_per_km", ParamValue::Bool(true)), Err(ConfigError::WrongType { .. })));
        assert!(matches!(p.set("cost_per_km", f64::NAN), Err(ConfigError::WrongType { .. })));
    }

    #[test]
    fn malformed_profile_id() {
        let mut p = SimulationParameters::default();
        assert_eq!(
            p.set("demand_profile", "weekend"),
            Err(ConfigError::UnknownProfile("weekend".into()))
        );
    }

    #[test]
    fn frequency_level_writes_probability() {
        let mut p = SimulationParameters::default();
        p.set("order_frequency_level", 5u64).unwrap();
        assert_eq!(p.order_probability, 0.70);
        assert_eq!(p.order_frequency_level(), Some(5));
        assert!(p.set("order_frequency_level", 6u64).is_err());
        assert_eq!(p.order_probability, 0.70);
    }

    #[test]
    fn inverted_speed_range_uses_minimum() {
        let p = SimulationParameters { agent_min_speed_kmph: 40.0, agent_max_speed_kmph: 25.0, ..Default::default() };
        assert_eq!(p.speed_range(), (40.0, 40.0));
    }

    #[test]
    fn validate_flags_bad_struct_literal() {
        let p = SimulationParameters { spawn_jitter_deg: 0.2, ..Default::default() };
        assert!(matches!(p.validate(), Err(ConfigError::OutOfRange { key: "spawn_jitter_deg", .. })));
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use super::*;

    #[test]
    fn sample_std_dev() {
        assert_eq!(std_dev_sample(&[]), None);
        assert_eq!(std_dev_sample(&[4.0]), None);
        let sd = std_dev_sample(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_run_has_no_averages() {
        let m = DerivedMetrics::compute(&RunStatistics::default(), &[], &SimulationParameters::default());
        assert_eq!(m.avg_delivery_time_min, None);
        assert_eq!(m.avg_wait_time_min, None);
        assert_eq!(m.agent_utilization_pct, None);
        assert_eq!(m.cost_per_order, None);
        assert_eq!(m.total_cost, 0.0);
    }

    #[test]
    fn utilization_is_ratio_of_sums() {
        let agents = vec![agent_with_times(0, 1, 10), agent_with_times(1, 50, 50)];
        let m = DerivedMetrics::compute(&RunStatistics::default(), &agents, &SimulationParameters::default());
        assert!((m.agent_utilization_pct.unwrap() - 85.0).abs() < 1e-12);
    }

    #[test]
    fn costs() {
        let mut s = RunStatistics { agent_active_minutes: 120, total_distance_km: 10.0, ..Default::default() };
        s.record_delivery(20.0);
        s.record_delivery(30.0);
        s.record_assignment(2);
        s.record_assignment(4);
        let m = DerivedMetrics::compute(&s, &[], &SimulationParameters::default());
        assert_eq!(m.labor_cost, 300.0);
        assert_eq!(m.travel_cost, 50.0);
        assert_eq!(m.fixed_delivery_cost, 20.0);
        assert_eq!(m.total_cost, 370.0);
        assert_eq!(m.cost_per_order, Some(185.0));
        assert_eq!(m.avg_delivery_time_min, Some(25.0));
        assert_eq!(m.min_delivery_time_min, Some(20.0));
        assert_eq!(m.max_delivery_time_min, Some(30.0));
        assert_eq!(m.avg_wait_time_min, Some(3.0));
        assert_eq!(s.delivered_within(25.0), 1);
    }
}

// ── Traffic & series ──────────────────────────────────────────────────────────

#[cfg(test)]
mod traffic {
    use super::*;
    use crate::traffic::TRAFFIC_LEVELS;

    #[test]
    fn fixed_never_changes() {
        let mut t = TrafficModel::fixed(1.2);
        let mut rng = SimRng::new(1);
        for n in 0..100 {
            assert_eq!(t.update(Tick(n), &mut rng), None);
            assert_eq!(t.factor(), 1.2);
        }
    }

    #[test]
    fn dynamic_resamples_on_schedule() {
        let mut t = TrafficModel::dynamic(1.0);
        let mut rng = SimRng::new(1);
        let hits: Vec<u64> = (1..=46).filter(|&n| t.update(Tick(n), &mut rng).is_some()).collect();
        assert_eq!(hits, vec![1, 15, 30, 45]);
        assert!(TRAFFIC_LEVELS.contains(&t.factor()));
    }

    #[test]
    fn series_window_rolls() {
        let mut s = LiveSeries::new(3);
        for n in 1..=5 {
            s.push(SeriesPoint { time: Tick(n), pending: n as usize, active_agents: 0 });
        }
        assert_eq!(s.len(), 3);
        let times: Vec<u64> = s.iter().map(|p| p.time.0).collect();
        assert_eq!(times, vec![3, 4, 5]);
        assert_eq!(s.latest().unwrap().pending, 5);
    }
}

// ── Interactive driver ────────────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use super::*;

    #[test]
    fn end_to_end_delivery_time_is_exact() {
        let mut sim = build(single_agent_params());
        sim.start();
        let hub = sim.world().hub;
        let dest = GeoPoint::new(hub.lat + 0.01, hub.lng);

        let id = sim.submit_order(dest).unwrap();
        assert_eq!(sim.world().agents[0].status, AgentStatus::ToStore);
        assert_eq!(sim.statistics().orders_assigned, 1);

        for _ in 0..20 {
            sim.tick().unwrap();
        }
        let order = sim.world().orders.get(id).unwrap();
        let expected = 5.0 + hub.distance_km(dest) / 30.0 * 60.0;
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!((order.delivery_time.unwrap() - expected).abs() < 1e-9);
        assert!((sim.statistics().delivery_times[0] - expected).abs() < 1e-9);
        assert_eq!(order.wait_time(), Some(0));
        assert!(sim.world().agents[0].is_available());
    }

    #[test]
    fn tick_requires_running() {
        let mut sim = build(single_agent_params());
        assert_eq!(sim.state(), RunState::Idle);
        assert!(sim.tick().is_none());
        sim.start();
        assert!(sim.tick().is_some());
        sim.pause();
        assert_eq!(sim.state(), RunState::Paused);
        assert!(sim.tick().is_none());
        assert_eq!(sim.now(), Tick(1));
    }

    #[test]
    fn resume_keeps_state() {
        let mut sim = build(SimulationParameters { order_probability: 1.0, ..Default::default() });
        sim.start();
        sim.run_ticks(10, &mut NoopObserver);
        let generated = sim.statistics().orders_generated;
        sim.pause();
        sim.start();
        assert_eq!(sim.now(), Tick(10));
        assert_eq!(sim.statistics().orders_generated, generated);
        sim.tick().unwrap();
        assert_eq!(sim.now(), Tick(11));
    }

    #[test]
    fn reset_rebuilds_fleet_from_edited_params() {
        let mut sim = build(SimulationParameters::default());
        assert_eq!(sim.world().agents.len(), 5);
        sim.set_parameter("num_agents", 9.0).unwrap();
        // Edits wait for the next reset.
        assert_eq!(sim.world().agents.len(), 5);
        sim.start();
        assert_eq!(sim.world().agents.len(), 9);
        sim.run_ticks(5, &mut NoopObserver);
        sim.set_parameter("num_agents", 3.0).unwrap();
        sim.reset();
        assert_eq!(sim.state(), RunState::Idle);
        assert_eq!(sim.now(), Tick::ZERO);
        assert_eq!(sim.world().agents.len(), 3);
        assert_eq!(sim.statistics(), &RunStatistics::default());
        assert!(sim.series().is_empty());
    }

    #[test]
    fn spawn_jitter_is_bounded() {
        let sim = build(SimulationParameters { num_agents: 50, ..Default::default() });
        let hub = sim.world().hub;
        for a in &sim.world().agents {
            assert!((a.location.lat - hub.lat).abs() <= 0.001 + 1e-12);
            assert!((a.location.lng - hub.lng).abs() <= 0.001 + 1e-12);
            assert!((20.0..=30.0).contains(&a.base_speed_kmph));
        }
    }

    #[test]
    fn unknown_custom_profile_is_rejected() {
        let mut sim = build(SimulationParameters::default());
        assert_eq!(
            sim.set_parameter("demand_profile", "custom_lunch"),
            Err(ConfigError::UnknownProfile("lunch".into()))
        );
        sim.insert_profile(DemandProfile::new("lunch", vec![Zone::new(ZoneShape::Uniform).with_rate(10.0, 20.0)]));
        sim.set_parameter("demand_profile", "custom_lunch").unwrap();
        assert_eq!(sim.params().demand_profile, ProfileId::Custom("lunch".into()));
    }

    #[test]
    fn invalid_submitted_location() {
        let mut sim = build(single_agent_params());
        assert!(matches!(
            sim.submit_order(GeoPoint::new(f64::NAN, 0.0)),
            Err(SimError::InvalidLocation(_))
        ));
        assert_eq!(sim.statistics().orders_generated, 0);
    }

    #[test]
    fn invariants_hold_over_a_busy_run() {
        let mut sim = build(SimulationParameters { order_probability: 0.7, num_agents: 3, seed: 7, ..Default::default() });
        sim.start();
        for _ in 0..300 {
            let report = sim.tick().unwrap();
            for a in &sim.world().agents {
                assert!(a.invariant_holds());
                assert!((0.6..=1.0).contains(&a.fatigue_factor));
            }
            assert_eq!(report.orphaned, 0);
        }
        let stats = sim.statistics();
        assert!(stats.orders_generated > 100);
        assert!(stats.orders_delivered > 0);
        assert!(stats.orders_delivered <= stats.orders_generated);
        assert!(stats.delivery_times.iter().all(|&d| d >= 0.0));
        assert_eq!(sim.world().orders.log().len() as u64, stats.orders_generated);
        assert_eq!(sim.series().len(), 100);
        assert_eq!(sim.series().latest().unwrap().time, Tick(300));
    }

    #[test]
    fn same_seed_same_run() {
        let params = SimulationParameters { order_probability: 0.55, dynamic_traffic: true, seed: 99, ..Default::default() };
        let mut a = build(params.clone());
        let mut b = build(params);
        a.start();
        b.start();
        a.run_ticks(200, &mut NoopObserver);
        b.run_ticks(200, &mut NoopObserver);
        assert_eq!(a.statistics(), b.statistics());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn report_has_one_row_per_agent_and_order() {
        let mut sim = build(SimulationParameters { order_probability: 0.5, ..Default::default() });
        sim.start();
        sim.run_ticks(60, &mut NoopObserver);
        let report = sim.report();
        assert_eq!(report.now, Tick(60));
        assert_eq!(report.agents.len(), 5);
        assert_eq!(report.orders.len() as u64, report.statistics.orders_generated);
        assert!(report.agents.iter().all(|a| a.busy_min + a.idle_min == 60));
        assert_eq!(report.metrics, sim.metrics());
    }

    #[test]
    fn snapshot_shows_only_working_set() {
        let mut sim = build(single_agent_params());
        sim.start();
        let hub = sim.world().hub;
        sim.submit_order(GeoPoint::new(hub.lat + 0.005, hub.lng)).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.orders.len(), 1);
        assert_eq!(snap.agents[0].assigned_order, snap.orders.first().map(|o| o.id));
        assert_eq!(snap.agents[0].route.len(), 2);
        sim.run_ticks(30, &mut NoopObserver);
        let snap = sim.snapshot();
        assert!(snap.orders.is_empty());
        assert!(snap.agents[0].route.is_empty());
        assert_eq!(snap.agents[0].eta_remaining_min, None);
    }

    #[test]
    fn observer_sees_every_tick() {
        #[derive(Default)]
        struct Counter {
            starts: u64,
            ends:   u64,
            resets: u64,
        }
        impl SimObserver for Counter {
            fn on_tick_start(&mut self, _now: Tick) {
                self.starts += 1;
            }
            fn on_tick_end(&mut self, report: &TickReport, world: &InteractiveWorld) {
                assert_eq!(report.now, world.now());
                self.ends += 1;
            }
            fn on_reset(&mut self, _world: &InteractiveWorld) {
                self.resets += 1;
            }
        }

        let mut sim = build(SimulationParameters::default());
        let mut counter = Counter::default();
        sim.reset_observed(&mut counter);
        sim.start();
        assert_eq!(sim.run_ticks(25, &mut counter), 25);
        assert_eq!((counter.starts, counter.ends, counter.resets), (25, 25, 1));
    }
}
