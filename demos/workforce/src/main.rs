//! workforce — sizes a dark-store fleet by batch simulation.
//!
//! Sweeps 2..=12 agents, five repetitions each, against a target of 40
//! orders inside 4 km of the hub over two simulated hours, then prints the
//! comparison table and the recommended fleet size.
//!
//! Usage: `workforce [sla_target_min]`.  The observer stops the sweep once
//! three consecutive fleet sizes deliver every order within the SLA.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ds_demand::CityMap;
use ds_optimize::{
    AbortHandle, BatchDemand, ConfigurationResult, RepetitionStats, SweepConfig, SweepObserver, WorkforceSweep,
};
use ds_sim::SimulationParameters;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:              u64   = 7;
const MIN_AGENTS:        usize = 2;
const MAX_AGENTS:        usize = 12;
const REPETITIONS:       usize = 5;
const MAX_DURATION_MIN:  u64   = 120;
const TARGET_ORDERS:     u32   = 40;
const ORDER_RADIUS_KM:   f64   = 4.0;
const DEFAULT_SLA_MIN:   f64   = 30.0;
const SATURATION_STREAK: usize = 3;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints progress and aborts once the SLA has been comfortably met.
struct SaturationStop {
    abort:  AbortHandle,
    streak: usize,
    units:  usize,
}

impl SweepObserver for SaturationStop {
    fn on_unit_done(&mut self, stats: &RepetitionStats) {
        self.units += 1;
        tracing::debug!(
            fleet_size = stats.fleet_size,
            repetition = stats.repetition,
            delivered = stats.statistics.orders_delivered,
            ended_at = %stats.ended_at,
            "repetition done"
        );
    }

    fn on_configuration_done(&mut self, result: &ConfigurationResult) {
        println!(
            "  {:>2} agents: SLA {:>5.1} %  completion {:>5.1} %",
            result.fleet_size,
            result.sla_pct,
            result.completion_rate * 100.0
        );
        if result.completion_rate >= 1.0 && result.sla_pct >= 100.0 {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        if self.streak >= SATURATION_STREAK {
            self.abort.abort();
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sla_target_min = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<f64>().with_context(|| format!("invalid SLA target `{arg}`"))?,
        None => DEFAULT_SLA_MIN,
    };

    let parameters = SimulationParameters { seed: SEED, ..SimulationParameters::default() };
    let config = SweepConfig {
        min_agents: MIN_AGENTS,
        max_agents: MAX_AGENTS,
        repetitions: REPETITIONS,
        max_duration_min: MAX_DURATION_MIN,
        sla_target_min,
        demand: BatchDemand::TargetCount { radius_km: ORDER_RADIUS_KM, target_orders: TARGET_ORDERS },
        hub: None,
        parameters,
    };

    println!("=== workforce — fleet sizing sweep ===");
    println!(
        "Agents {MIN_AGENTS}..={MAX_AGENTS}  |  {REPETITIONS} runs each  |  {TARGET_ORDERS} orders in {MAX_DURATION_MIN} min  |  SLA {sla_target_min} min"
    );
    println!();

    let sweep = WorkforceSweep::new(config, CityMap::chandigarh())?;
    let mut observer = SaturationStop { abort: sweep.abort_handle(), streak: 0, units: 0 };

    let t0 = Instant::now();
    let outcome = sweep.run(&mut observer);
    let elapsed = t0.elapsed();

    println!();
    println!("{} repetitions in {:.3} s{}", observer.units, elapsed.as_secs_f64(), if outcome.aborted {
        " (stopped early)"
    } else {
        ""
    });
    println!();

    // Comparison table.
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |x| format!("{x:.1}"));
    println!(
        "{:>6} {:>7} {:>7} {:>8} {:>6} {:>7} {:>7} {:>6} {:>9}",
        "Agents", "Gen", "Deliv", "AvgTime", "SLA%", "StdDev", "Wait", "Util%", "Cost/ord"
    );
    println!("{}", "-".repeat(72));
    for c in &outcome.configurations {
        println!(
            "{:>6} {:>7.1} {:>7.1} {:>8} {:>6.1} {:>7} {:>7} {:>6} {:>9}",
            c.fleet_size,
            c.avg_generated,
            c.avg_delivered,
            fmt(c.avg_delivery_time_min),
            c.sla_pct,
            fmt(c.std_dev_delivery_min),
            fmt(c.avg_wait_time_min),
            fmt(c.utilization_pct),
            c.cost_per_order.map_or_else(|| "n/a".to_owned(), |x| format!("{x:.2}")),
        );
    }
    println!();

    match &outcome.recommendation {
        Some(rec) => {
            println!("Recommended fleet size: {} agents", rec.fleet_size);
            println!("  qualification : {:?}", rec.tier);
            println!("  utilization   : {} ({})", fmt(rec.result.utilization_pct), rec.band);
            println!("  avg delivery  : {} min", fmt(rec.result.avg_delivery_time_min));
            println!("  total cost    : {:.2} per run", rec.result.total_cost);
        }
        None => println!("No configuration completed; nothing to recommend."),
    }

    Ok(())
}
