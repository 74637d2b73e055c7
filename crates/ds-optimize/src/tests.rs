//! Unit tests for ds-optimize.

use ds_core::Tick;
use ds_demand::{CityMap, DemandProfile, Zone, ZoneShape};
use ds_sim::{RunStatistics, SimulationParameters};

use crate::{
    AbortHandle, BatchDemand, ConfigurationResult, NoopSweepObserver, OptimizeError, RepetitionStats,
    SelectionTier, SweepConfig, SweepObserver, SweepOutcome, UtilizationBand, WorkforceSweep, run_repetition,
    select_recommendation,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn result(fleet_size: usize, completion: f64, sla_pct: f64, cost: Option<f64>, util: Option<f64>) -> ConfigurationResult {
    ConfigurationResult {
        fleet_size,
        repetitions: 3,
        avg_generated: 20.0,
        avg_delivered: 20.0 * completion,
        avg_undelivered: 20.0 * (1.0 - completion),
        completion_rate: completion,
        sla_pct,
        avg_delivery_time_min: Some(25.0),
        min_delivery_time_min: Some(10.0),
        max_delivery_time_min: Some(40.0),
        std_dev_delivery_min: Some(5.0),
        avg_wait_time_min: Some(1.0),
        utilization_pct: util,
        labor_cost: 0.0,
        travel_cost: 0.0,
        fixed_delivery_cost: 0.0,
        total_cost: 0.0,
        cost_per_order: cost,
    }
}

fn small_sweep(min: usize, max: usize) -> SweepConfig {
    SweepConfig {
        min_agents: min,
        max_agents: max,
        repetitions: 2,
        max_duration_min: 60,
        sla_target_min: 30.0,
        demand: BatchDemand::TargetCount { radius_km: 3.0, target_orders: 10 },
        hub: None,
        parameters: SimulationParameters::default(),
    }
}

fn stats(generated: u64, deliveries: &[f64], active: u64, distance_km: f64) -> RunStatistics {
    let mut s = RunStatistics { orders_generated: generated, agent_active_minutes: active, total_distance_km: distance_km, ..Default::default() };
    for &d in deliveries {
        s.record_delivery(d);
        s.record_assignment(1);
    }
    s
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn normalization_clamps() {
        let c = SweepConfig { min_agents: 0, max_agents: 0, ..Default::default() }.normalized();
        assert_eq!((c.min_agents, c.max_agents), (1, 10));

        let c = SweepConfig { min_agents: 3, max_agents: 80, ..Default::default() }.normalized();
        assert_eq!((c.min_agents, c.max_agents), (3, 10));

        let c = SweepConfig { min_agents: 12, max_agents: 5, ..Default::default() }.normalized();
        assert_eq!((c.min_agents, c.max_agents), (12, 12));

        let c = SweepConfig { min_agents: 4, max_agents: 7, ..Default::default() }.normalized();
        assert_eq!((c.min_agents, c.max_agents), (4, 7));
    }

    #[test]
    fn oversized_minimum_leaves_empty_range() {
        let c = SweepConfig { min_agents: 60, max_agents: 70, ..Default::default() }.normalized();
        assert_eq!(c.max_agents, 50);
        assert_eq!(c.validate(), Err(OptimizeError::EmptyFleetRange { min: 60, max: 50 }));
    }

    #[test]
    fn validation() {
        assert!(SweepConfig::default().validate().is_ok());
        let bad = |c: SweepConfig| c.validate().unwrap_err();
        assert_eq!(bad(SweepConfig { repetitions: 0, ..Default::default() }), OptimizeError::ZeroRepetitions);
        assert_eq!(bad(SweepConfig { max_duration_min: 0, ..Default::default() }), OptimizeError::ZeroDuration);
        assert_eq!(bad(SweepConfig { sla_target_min: 0.0, ..Default::default() }), OptimizeError::InvalidSlaTarget(0.0));
        assert!(matches!(
            bad(SweepConfig {
                demand: BatchDemand::TargetCount { radius_km: 2.0, target_orders: 0 },
                ..Default::default()
            }),
            OptimizeError::InvalidDemand(_)
        ));
        assert!(matches!(
            bad(SweepConfig { demand: BatchDemand::Profile(DemandProfile::new("empty", vec![])), ..Default::default() }),
            OptimizeError::InvalidDemand(_)
        ));
    }

    #[test]
    fn sweep_new_normalizes_then_validates() {
        let sweep = WorkforceSweep::new(SweepConfig { min_agents: 0, max_agents: 99, ..Default::default() }, CityMap::chandigarh())
            .unwrap();
        assert_eq!(sweep.config().fleet_sizes(), 1..=10);
        assert_eq!(sweep.hub(), CityMap::chandigarh().hub);

        let err = WorkforceSweep::new(SweepConfig { repetitions: 0, ..Default::default() }, CityMap::chandigarh());
        assert!(matches!(err, Err(OptimizeError::ZeroRepetitions)));
    }
}

// ── Aggregation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod aggregation {
    use super::*;

    #[test]
    fn pools_and_averages() {
        let runs = vec![
            RepetitionStats {
                fleet_size:    2,
                repetition:    0,
                statistics:    stats(10, &[10.0, 40.0], 60, 4.0),
                within_sla:    1,
                busy_minutes:  60,
                total_minutes: 100,
                ended_at:      Tick(50),
            },
            RepetitionStats {
                fleet_size:    2,
                repetition:    1,
                statistics:    stats(6, &[20.0, 30.0], 120, 6.0),
                within_sla:    2,
                busy_minutes:  120,
                total_minutes: 200,
                ended_at:      Tick(100),
            },
        ];
        let r = ConfigurationResult::aggregate(&runs, &SimulationParameters::default().cost_rates()).unwrap();

        assert_eq!(r.fleet_size, 2);
        assert_eq!(r.repetitions, 2);
        assert_eq!(r.avg_generated, 8.0);
        assert_eq!(r.avg_delivered, 2.0);
        assert_eq!(r.avg_undelivered, 6.0);
        assert_eq!(r.completion_rate, 0.25);
        assert_eq!(r.sla_pct, 75.0);
        assert_eq!(r.avg_delivery_time_min, Some(25.0));
        assert_eq!(r.min_delivery_time_min, Some(10.0));
        assert_eq!(r.max_delivery_time_min, Some(40.0));
        assert!((r.utilization_pct.unwrap() - 60.0).abs() < 1e-12);
        assert_eq!(r.labor_cost, 225.0);
        assert_eq!(r.travel_cost, 25.0);
        assert_eq!(r.fixed_delivery_cost, 20.0);
        assert_eq!(r.total_cost, 270.0);
        assert_eq!(r.cost_per_order, Some(135.0));
    }

    #[test]
    fn nothing_delivered() {
        let runs = vec![RepetitionStats {
            fleet_size:    1,
            repetition:    0,
            statistics:    stats(0, &[], 0, 0.0),
            within_sla:    0,
            busy_minutes:  0,
            total_minutes: 30,
            ended_at:      Tick(30),
        }];
        let r = ConfigurationResult::aggregate(&runs, &SimulationParameters::default().cost_rates()).unwrap();
        assert_eq!(r.completion_rate, 0.0);
        assert_eq!(r.sla_pct, 0.0);
        assert_eq!(r.cost_per_order, None);
        assert_eq!(r.utilization_pct, Some(0.0));
        assert!(ConfigurationResult::aggregate(&[], &SimulationParameters::default().cost_rates()).is_none());
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn sla_outweighs_cheaper_fleet() {
        let results = vec![
            result(3, 0.95, 70.0, Some(40.0), Some(88.0)),
            result(4, 0.98, 85.0, Some(42.0), Some(75.0)),
            result(5, 1.00, 90.0, Some(50.0), Some(55.0)),
        ];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.fleet_size, 4);
        assert_eq!(rec.tier, SelectionTier::CompletionAndSla);
        assert_eq!(rec.band, UtilizationBand::Ideal);
    }

    #[test]
    fn balanced_fleet_beats_saturated_one() {
        let results = vec![result(3, 1.0, 90.0, Some(10.0), Some(95.0)), result(4, 1.0, 92.0, Some(10.5), Some(75.0))];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.fleet_size, 4);
        assert_eq!(rec.tier, SelectionTier::CompletionAndSla);
        assert_eq!(rec.band, UtilizationBand::Ideal);
    }

    #[test]
    fn near_equal_utilization_prefers_fewer_agents() {
        let results = vec![result(4, 1.0, 90.0, Some(40.0), Some(80.0)), result(5, 1.0, 90.0, Some(40.5), Some(80.5))];
        assert_eq!(select_recommendation(&results).unwrap().fleet_size, 4);

        let results = vec![result(4, 1.0, 90.0, Some(40.0), Some(80.0)), result(5, 1.0, 90.0, Some(40.5), Some(81.5))];
        assert_eq!(select_recommendation(&results).unwrap().fleet_size, 5);
    }

    #[test]
    fn tiers_relax_in_order() {
        let results = vec![result(2, 0.9, 50.0, Some(30.0), Some(80.0)), result(3, 0.7, 90.0, Some(20.0), Some(80.0))];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.tier, SelectionTier::CompletionOnly);
        assert_eq!(rec.fleet_size, 2);

        let results = vec![result(2, 0.5, 90.0, Some(30.0), Some(80.0)), result(3, 0.7, 90.0, Some(20.0), Some(80.0))];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.tier, SelectionTier::Unfiltered);
        assert_eq!(rec.fleet_size, 3);
    }

    #[test]
    fn higher_utilization_then_fewer_agents() {
        let results = vec![
            result(4, 1.0, 90.0, Some(40.0), Some(70.0)),
            result(5, 1.0, 90.0, Some(41.0), Some(80.0)),
            result(6, 1.0, 90.0, Some(43.0), Some(80.0)),
        ];
        assert_eq!(select_recommendation(&results).unwrap().fleet_size, 5);
    }

    #[test]
    fn cost_band_excludes_expensive_ideal() {
        let results = vec![result(2, 1.0, 90.0, Some(40.0), Some(95.0)), result(3, 1.0, 90.0, Some(45.0), Some(80.0))];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.fleet_size, 2);
        assert_eq!(rec.band, UtilizationBand::Over);
    }

    #[test]
    fn cheapest_when_band_is_underused() {
        let results = vec![result(6, 1.0, 90.0, Some(41.0), Some(40.0)), result(7, 1.0, 90.0, Some(40.0), Some(35.0))];
        let rec = select_recommendation(&results).unwrap();
        assert_eq!(rec.fleet_size, 7);
        assert_eq!(rec.band, UtilizationBand::Under);
    }

    #[test]
    fn missing_cost_sorts_last() {
        let results = vec![result(1, 1.0, 90.0, None, Some(80.0)), result(2, 1.0, 90.0, Some(500.0), Some(30.0))];
        assert_eq!(select_recommendation(&results).unwrap().fleet_size, 2);
    }

    #[test]
    fn empty_input() {
        assert_eq!(select_recommendation(&[]), None);
    }
}

// ── Repetitions & sweeps ──────────────────────────────────────────────────────

#[cfg(test)]
mod sweeps {
    use super::*;

    #[test]
    fn repetition_is_reproducible() {
        let city = CityMap::chandigarh();
        let config = small_sweep(2, 2);
        let a = run_repetition(&config, &city, city.hub, 2, 1);
        let b = run_repetition(&config, &city, city.hub, 2, 1);
        assert_eq!(a, b);
        let c = run_repetition(&config, &city, city.hub, 2, 0);
        assert_eq!(c.repetition, 0);
    }

    #[test]
    fn target_count_is_a_soft_cap() {
        let city = CityMap::chandigarh();
        let config = SweepConfig {
            demand: BatchDemand::TargetCount { radius_km: 3.0, target_orders: 15 },
            max_duration_min: 90,
            ..small_sweep(3, 3)
        };
        for rep in 0..5 {
            let r = run_repetition(&config, &city, city.hub, 3, rep);
            assert!(r.statistics.orders_generated <= 15);
            assert!(r.statistics.orders_delivered <= r.statistics.orders_generated);
            assert!(r.ended_at <= Tick(90));
            assert_eq!(r.total_minutes, 3 * r.ended_at.0);
            assert!(r.busy_minutes <= r.total_minutes);
            assert!(r.within_sla <= r.statistics.orders_delivered);
        }
    }

    #[test]
    fn bounded_profile_ends_early() {
        let city = CityMap::chandigarh();
        let zone = Zone::new(ZoneShape::Uniform).with_rate(600.0, 600.0).with_window(1, Some(3));
        let config = SweepConfig {
            demand: BatchDemand::Profile(DemandProfile::new("burst", vec![zone])),
            max_duration_min: 500,
            ..small_sweep(3, 3)
        };
        let r = run_repetition(&config, &city, city.hub, 3, 0);
        assert_eq!(r.statistics.orders_generated, 3);
        assert_eq!(r.statistics.orders_delivered, 3);
        assert!(r.ended_at > Tick(3) && r.ended_at < Tick(500));
    }

    #[test]
    fn open_ended_profile_runs_full_duration() {
        let city = CityMap::chandigarh();
        let zone = Zone::new(ZoneShape::Uniform).with_rate(0.0, 0.0);
        let config = SweepConfig {
            demand: BatchDemand::Profile(DemandProfile::new("quiet", vec![zone])),
            max_duration_min: 30,
            ..small_sweep(1, 1)
        };
        let r = run_repetition(&config, &city, city.hub, 1, 0);
        assert_eq!(r.statistics.orders_generated, 0);
        assert_eq!(r.ended_at, Tick(30));
        assert_eq!((r.busy_minutes, r.total_minutes), (0, 30));
    }

    #[test]
    fn full_sweep() {
        #[derive(Default)]
        struct Counts {
            units:   usize,
            configs: Vec<usize>,
            ended:   bool,
        }
        impl SweepObserver for Counts {
            fn on_unit_done(&mut self, _stats: &RepetitionStats) {
                self.units += 1;
            }
            fn on_configuration_done(&mut self, result: &ConfigurationResult) {
                self.configs.push(result.fleet_size);
            }
            fn on_sweep_end(&mut self, outcome: &SweepOutcome) {
                self.ended = !outcome.aborted;
            }
        }

        let sweep = WorkforceSweep::new(small_sweep(1, 3), CityMap::chandigarh()).unwrap();
        let mut counts = Counts::default();
        let outcome = sweep.run(&mut counts);

        assert!(!outcome.aborted);
        assert_eq!(counts.units, 6);
        assert_eq!(counts.configs, vec![1, 2, 3]);
        assert!(counts.ended);
        let sizes: Vec<usize> = outcome.configurations.iter().map(|c| c.fleet_size).collect();
        assert_eq!(sizes, vec![1, 2, 3]);
        assert!(outcome.configurations.iter().all(|c| c.repetitions == 2));
        assert!(outcome.recommendation.is_some());
    }

    #[test]
    fn abort_before_start() {
        let sweep = WorkforceSweep::new(small_sweep(1, 3), CityMap::chandigarh()).unwrap();
        sweep.abort_handle().abort();
        let outcome = sweep.run(&mut NoopSweepObserver);
        assert!(outcome.aborted);
        assert!(outcome.configurations.is_empty());
        assert_eq!(outcome.recommendation, None);
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn abort_between_fleet_sizes() {
        struct StopAfterFirst(AbortHandle);
        impl SweepObserver for StopAfterFirst {
            fn on_configuration_done(&mut self, _result: &ConfigurationResult) {
                self.0.abort();
            }
        }

        let sweep = WorkforceSweep::new(small_sweep(1, 4), CityMap::chandigarh()).unwrap();
        let mut observer = StopAfterFirst(sweep.abort_handle());
        let outcome = sweep.run(&mut observer);
        assert!(outcome.aborted);
        assert_eq!(outcome.configurations.len(), 1);
        assert_eq!(outcome.recommendation.map(|r| r.fleet_size), Some(1));
    }

    #[test]
    fn sweep_is_deterministic() {
        let a = WorkforceSweep::new(small_sweep(2, 3), CityMap::chandigarh()).unwrap().run(&mut NoopSweepObserver);
        let b = WorkforceSweep::new(small_sweep(2, 3), CityMap::chandigarh()).unwrap().run(&mut NoopSweepObserver);
        assert_eq!(a, b);
    }
}
