//! One batch repetition: a short-lived world driven to completion.

use ds_core::geo::sample_disk_point;
use ds_core::{GeoPoint, SimRng, Tick};
use ds_demand::{CityMap, OrderLocationSampler};
use ds_fleet::DirectPlanner;
use ds_sim::{RunStatistics, SimulationWorld, TrafficModel, WorldConfig};

use crate::{BatchDemand, SweepConfig};

/// Disk attempts for target-count demand before falling back to the hub.
pub const TARGET_DISK_ATTEMPTS: usize = 100;

/// Raw outcome of one (fleet size, repetition) unit.
#[derive(Clone, Debug, PartialEq)]
pub struct RepetitionStats {
    pub fleet_size:    usize,
    pub repetition:    usize,
    pub statistics:    RunStatistics,
    /// Deliveries within the SLA target.
    pub within_sla:    u64,
    /// Σ busy agent-minutes.
    pub busy_minutes:  u64,
    /// Σ agent-minutes elapsed.
    pub total_minutes: u64,
    /// Time the run stopped at.
    pub ended_at:      Tick,
}

/// Run one repetition with `fleet_size` agents at `hub`.
///
/// Agents start exactly at the hub and traffic stays at the base factor.
/// Routes are straight lines.  The run stops at `max_duration_min` or
/// earlier once demand is exhausted and every order is delivered.
pub fn run_repetition(
    config:     &SweepConfig,
    city:       &CityMap,
    hub:        GeoPoint,
    fleet_size: usize,
    repetition: usize,
) -> RepetitionStats {
    let params = &config.parameters;
    let (min_speed, max_speed) = params.speed_range();
    let world_config = WorldConfig {
        hub,
        num_agents: fleet_size,
        min_speed_kmph: min_speed,
        max_speed_kmph: max_speed,
        spawn_jitter_deg: 0.0,
        handling_time_min: params.handling_time_min,
        traffic: TrafficModel::fixed(params.base_traffic_factor),
    };
    let rng = SimRng::for_unit(params.seed, fleet_size, repetition);
    let mut world = SimulationWorld::new(&world_config, DirectPlanner, rng);
    let sampler = OrderLocationSampler::new(city, hub);

    while world.now().0 < config.max_duration_min {
        let (now, _) = world.advance_clock();
        generate(&mut world, config, city, &sampler, now);
        world.step_movement();
        world.dispatch();

        if demand_exhausted(&world, &config.demand, now) && world.orders.all_delivered() {
            tracing::debug!(fleet_size, repetition, %now, "repetition finished early");
            break;
        }
    }

    let (busy_minutes, total_minutes) = world.agent_minutes();
    let within_sla = world.stats.delivered_within(config.sla_target_min);
    RepetitionStats {
        fleet_size,
        repetition,
        statistics: world.stats,
        within_sla,
        busy_minutes,
        total_minutes,
        ended_at: world.clock.now(),
    }
}

fn generate(
    world:   &mut SimulationWorld<DirectPlanner>,
    config:  &SweepConfig,
    city:    &CityMap,
    sampler: &OrderLocationSampler<'_>,
    now:     Tick,
) {
    match &config.demand {
        BatchDemand::TargetCount { radius_km, target_orders } => {
            let target = u64::from(*target_orders);
            if world.stats.orders_generated >= target {
                return;
            }
            let p = target as f64 / config.max_duration_min as f64;
            if world.rng.gen_bool(p) {
                let location = sample_disk_point(world.hub, *radius_km, &city.boundary, TARGET_DISK_ATTEMPTS, &mut world.rng)
                    .unwrap_or(world.hub);
                world.place_order(location);
            }
        }
        BatchDemand::Profile(profile) => {
            for zone in profile.active_zones(now) {
                if !world.rng.gen_bool(zone.mean_rate() / 60.0) {
                    continue;
                }
                if let Some(location) = sampler.sample_zone(zone, &mut world.rng) {
                    world.place_order(location);
                }
            }
        }
    }
}

/// `true` once no further orders can arrive.
///
/// Target-count demand is exhausted when the target is reached.  A profile
/// is exhausted after its last zone closes; a profile with an open-ended
/// zone never is.
fn demand_exhausted(world: &SimulationWorld<DirectPlanner>, demand: &BatchDemand, now: Tick) -> bool {
    match demand {
        BatchDemand::TargetCount { target_orders, .. } => world.stats.orders_generated >= u64::from(*target_orders),
        BatchDemand::Profile(profile) => profile.last_end_time().is_some_and(|end| now.0 > end),
    }
}
