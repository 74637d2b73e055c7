//! interactive — drives the step-wise simulator the way a live map would.
//!
//! Runs a Chandigarh dark store for four simulated hours with dynamic
//! traffic, pauses half way to drop in a manual order, then prints the
//! run summary and writes the full report as JSON.
//!
//! Usage: `interactive [profiles.json]`.  With a profile file the first
//! profile in it drives demand instead of the default uniform pattern.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ds_core::GeoPoint;
use ds_demand::load_profiles_json;
use ds_sim::{InteractiveWorld, SimObserver, SimulationBuilder, SimulationParameters, TickReport};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:             u64 = 42;
const NUM_AGENTS:       u64 = 6;
const SIM_MINUTES:      u64 = 240;
const PROGRESS_EVERY:   u64 = 30;
const FREQUENCY_LEVEL:  u64 = 4;
const REPORT_DIR:       &str = "output/interactive";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ProgressPrinter {
    delivered: usize,
    assigned:  usize,
}

impl SimObserver for ProgressPrinter {
    fn on_tick_end(&mut self, report: &TickReport, world: &InteractiveWorld) {
        self.delivered += report.delivered;
        self.assigned += report.assignments.len();
        if let Some(factor) = report.traffic_resampled {
            tracing::debug!(now = %report.now, factor, "traffic changed");
        }
        if report.now.0 % PROGRESS_EVERY == 0 {
            println!(
                "{:>6}  pending {:>3}  busy {:>2}/{:<2}  traffic {:.1}  delivered {:>4}",
                report.now.to_string(),
                report.pending,
                report.active_agents,
                world.agents.len(),
                report.traffic_factor,
                self.delivered,
            );
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

    println!("=== interactive — dark-store delivery simulator ===");
    println!("Agents: {NUM_AGENTS}  |  Minutes: {SIM_MINUTES}  |  Seed: {SEED}");
    println!();

    // 1. Parameters, edited the way a settings panel would.
    let mut params = SimulationParameters::default();
    params.set("num_agents", NUM_AGENTS)?;
    params.set("order_frequency_level", FREQUENCY_LEVEL)?;
    params.set("dynamic_traffic", true)?;
    params.set("seed", SEED.to_string())?;

    // 2. Optional custom demand.
    let mut builder = SimulationBuilder::new();
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        let catalog = load_profiles_json(&path).with_context(|| format!("loading {}", path.display()))?;
        if let Some(name) = catalog.names().next() {
            println!("Demand profile: custom_{name} (from {})", path.display());
            params.set("demand_profile", format!("custom_{name}"))?;
        }
        builder = builder.catalog(catalog);
    }

    // 3. Build and run the first half.
    let mut sim = builder.params(params).build()?;
    let mut progress = ProgressPrinter::default();
    let t0 = Instant::now();

    sim.start();
    sim.run_ticks(SIM_MINUTES / 2, &mut progress);

    // 4. Pause, place a manual order next to the hub, resume.
    sim.pause();
    let hub = sim.world().hub;
    let manual = sim.submit_order(GeoPoint::new(hub.lat + 0.012, hub.lng - 0.008))?;
    println!("-- paused at {}: manual order {manual} placed --", sim.now());
    sim.start();
    sim.run_ticks(SIM_MINUTES - SIM_MINUTES / 2, &mut progress);
    sim.pause();

    let elapsed = t0.elapsed();
    println!();
    println!("Simulated {} minutes in {:.3} s", sim.now().0, elapsed.as_secs_f64());

    // 5. Summary.
    let stats = sim.statistics();
    let metrics = sim.metrics();
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_owned(), |x| format!("{x:.1}"));
    println!();
    println!("Orders generated      : {}", stats.orders_generated);
    println!("Orders delivered      : {}", stats.orders_delivered);
    println!("Assignments           : {}", progress.assigned);
    println!("Avg delivery time     : {} min", fmt(metrics.avg_delivery_time_min));
    println!("Delivery time std dev : {} min", fmt(metrics.std_dev_delivery_min));
    println!("Avg wait for agent    : {} min", fmt(metrics.avg_wait_time_min));
    println!("Fleet utilization     : {} %", fmt(metrics.agent_utilization_pct));
    println!("Total cost            : {:.2}", metrics.total_cost);
    println!("Cost per order        : {}", fmt(metrics.cost_per_order));
    println!();

    // 6. Per-agent table.
    let report = sim.report();
    println!("{:<6} {:>6} {:>8} {:>10} {:>9} {:>6}", "Agent", "Speed", "Fatigue", "Deliveries", "Km", "Util%");
    println!("{}", "-".repeat(50));
    for a in &report.agents {
        println!(
            "{:<6} {:>6.1} {:>8.2} {:>10} {:>9.2} {:>6}",
            a.id.to_string(),
            a.base_speed_kmph,
            a.fatigue_factor,
            a.deliveries_made,
            a.distance_traveled_km,
            fmt(a.utilization_pct),
        );
    }

    // 7. Full report as JSON.
    std::fs::create_dir_all(REPORT_DIR)?;
    let out = Path::new(REPORT_DIR).join("report.json");
    std::fs::write(&out, serde_json::to_string_pretty(&report)?)?;
    println!();
    println!("Report written to {} ({} orders)", out.display(), report.orders.len());

    Ok(())
}
