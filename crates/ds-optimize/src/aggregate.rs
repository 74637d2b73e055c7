//! Pooling repetitions into one result per fleet size.

use ds_sim::{CostRates, DerivedMetrics, RunStatistics};

use crate::RepetitionStats;

/// Averaged outcome of every repetition at one fleet size.
///
/// Counts and costs are per-repetition averages.  Delivery-time figures
/// come from the pooled list of every delivery across repetitions, and
/// utilization is Σ busy / Σ total agent-minutes.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationResult {
    pub fleet_size:            usize,
    pub repetitions:           usize,
    pub avg_generated:         f64,
    pub avg_delivered:         f64,
    pub avg_undelivered:       f64,
    /// `delivered / generated`, 0 when nothing was generated.
    pub completion_rate:       f64,
    /// Percent of deliveries within the SLA target, 0 when nothing was
    /// delivered.
    pub sla_pct:               f64,
    pub avg_delivery_time_min: Option<f64>,
    pub min_delivery_time_min: Option<f64>,
    pub max_delivery_time_min: Option<f64>,
    pub std_dev_delivery_min:  Option<f64>,
    pub avg_wait_time_min:     Option<f64>,
    pub utilization_pct:       Option<f64>,
    pub labor_cost:            f64,
    pub travel_cost:           f64,
    pub fixed_delivery_cost:   f64,
    pub total_cost:            f64,
    pub cost_per_order:        Option<f64>,
}

impl ConfigurationResult {
    /// Pool `runs`, all of which must share one fleet size.  `None` when
    /// `runs` is empty.
    pub fn aggregate(runs: &[RepetitionStats], rates: &CostRates) -> Option<Self> {
        let first = runs.first()?;
        let r = runs.len() as f64;

        let mut pooled = RunStatistics::default();
        let (mut within, mut busy, mut total) = (0u64, 0u64, 0u64);
        for run in runs {
            let s = &run.statistics;
            pooled.orders_generated += s.orders_generated;
            pooled.orders_delivered += s.orders_delivered;
            pooled.sum_delivery_time += s.sum_delivery_time;
            pooled.delivery_times.extend_from_slice(&s.delivery_times);
            pooled.sum_wait_time += s.sum_wait_time;
            pooled.orders_assigned += s.orders_assigned;
            pooled.agent_active_minutes += s.agent_active_minutes;
            pooled.total_distance_km += s.total_distance_km;
            pooled.total_travel_min += s.total_travel_min;
            pooled.total_handling_min += s.total_handling_min;
            pooled.orphan_recoveries += s.orphan_recoveries;
            within += run.within_sla;
            busy += run.busy_minutes;
            total += run.total_minutes;
        }

        let m = DerivedMetrics::from_parts(&pooled, busy, total, rates);
        let avg_generated = pooled.orders_generated as f64 / r;
        let avg_delivered = pooled.orders_delivered as f64 / r;

        Some(Self {
            fleet_size: first.fleet_size,
            repetitions: runs.len(),
            avg_generated,
            avg_delivered,
            avg_undelivered: avg_generated - avg_delivered,
            completion_rate: if pooled.orders_generated > 0 {
                pooled.orders_delivered as f64 / pooled.orders_generated as f64
            } else {
                0.0
            },
            sla_pct: if pooled.orders_delivered > 0 {
                within as f64 / pooled.orders_delivered as f64 * 100.0
            } else {
                0.0
            },
            avg_delivery_time_min: m.avg_delivery_time_min,
            min_delivery_time_min: m.min_delivery_time_min,
            max_delivery_time_min: m.max_delivery_time_min,
            std_dev_delivery_min: m.std_dev_delivery_min,
            avg_wait_time_min: m.avg_wait_time_min,
            utilization_pct: m.agent_utilization_pct,
            labor_cost: m.labor_cost / r,
            travel_cost: m.travel_cost / r,
            fixed_delivery_cost: m.fixed_delivery_cost / r,
            total_cost: m.total_cost / r,
            cost_per_order: m.cost_per_order,
        })
    }
}
