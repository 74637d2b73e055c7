//! Run statistics and derived metrics.
//!
//! [`RunStatistics`] only holds raw accumulators.  Everything a report shows
//! (averages, utilization, costs) is computed on demand by
//! [`DerivedMetrics::compute`] so it can never go stale.

use ds_fleet::Agent;

use crate::params::{CostRates, SimulationParameters};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStatistics {
    pub orders_generated:     u64,
    pub orders_delivered:     u64,
    pub sum_delivery_time:    f64,
    /// Every delivery duration, minutes, in delivery order.
    pub delivery_times:       Vec<f64>,
    pub sum_wait_time:        u64,
    pub orders_assigned:      u64,
    /// Busy agent-minutes.
    pub agent_active_minutes: u64,
    pub total_distance_km:    f64,
    pub total_travel_min:     f64,
    pub total_handling_min:   f64,
    pub orphan_recoveries:    u64,
}

impl RunStatistics {
    pub fn record_delivery(&mut self, duration_min: f64) {
        self.orders_delivered += 1;
        self.sum_delivery_time += duration_min;
        self.delivery_times.push(duration_min);
    }

    pub fn record_assignment(&mut self, wait_min: u64) {
        self.orders_assigned += 1;
        self.sum_wait_time += wait_min;
    }

    /// Deliveries that took at most `target_min` minutes.
    pub fn delivered_within(&self, target_min: f64) -> u64 {
        self.delivery_times.iter().filter(|&&d| d <= target_min).count() as u64
    }
}

// ── DerivedMetrics ────────────────────────────────────────────────────────────

/// Report-ready figures.  `None` where the input is too small to say.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedMetrics {
    pub avg_delivery_time_min:  Option<f64>,
    pub std_dev_delivery_min:   Option<f64>,
    pub min_delivery_time_min:  Option<f64>,
    pub max_delivery_time_min:  Option<f64>,
    pub avg_wait_time_min:      Option<f64>,
    /// Σ busy / Σ total agent time, percent.
    pub agent_utilization_pct:  Option<f64>,
    pub labor_cost:             f64,
    pub travel_cost:            f64,
    pub fixed_delivery_cost:    f64,
    pub total_cost:             f64,
    pub cost_per_order:         Option<f64>,
}

impl DerivedMetrics {
    /// Metrics of an interactive run, utilization taken from `agents`.
    pub fn compute(stats: &RunStatistics, agents: &[Agent], params: &SimulationParameters) -> Self {
        let busy: u64 = agents.iter().map(|a| a.busy_time).sum();
        let total: u64 = agents.iter().map(|a| a.total_time).sum();
        Self::from_parts(stats, busy, total, &params.cost_rates())
    }

    /// Metrics from raw totals.  The batch sweep pools repetitions through
    /// here.
    pub fn from_parts(stats: &RunStatistics, busy_minutes: u64, total_minutes: u64, rates: &CostRates) -> Self {
        let delivered = stats.orders_delivered;
        let avg = (delivered > 0).then(|| stats.sum_delivery_time / delivered as f64);

        let labor_cost = stats.agent_active_minutes as f64 / 60.0 * rates.agent_cost_per_hour;
        let travel_cost = stats.total_distance_km * rates.cost_per_km;
        let fixed_delivery_cost = delivered as f64 * rates.fixed_cost_per_delivery;
        let total_cost = labor_cost + travel_cost + fixed_delivery_cost;

        Self {
            avg_delivery_time_min: avg,
            std_dev_delivery_min: std_dev_sample(&stats.delivery_times),
            min_delivery_time_min: stats.delivery_times.iter().copied().reduce(f64::min),
            max_delivery_time_min: stats.delivery_times.iter().copied().reduce(f64::max),
            avg_wait_time_min: (stats.orders_assigned > 0)
                .then(|| stats.sum_wait_time as f64 / stats.orders_assigned as f64),
            agent_utilization_pct: utilization_pct(busy_minutes, total_minutes),
            labor_cost,
            travel_cost,
            fixed_delivery_cost,
            total_cost,
            cost_per_order: (delivered > 0).then(|| total_cost / delivered as f64),
        }
    }
}

/// `busy / total × 100`, `None` when no time has passed.
#[inline]
pub fn utilization_pct(busy_minutes: u64, total_minutes: u64) -> Option<f64> {
    (total_minutes > 0).then(|| busy_minutes as f64 / total_minutes as f64 * 100.0)
}

/// Sample standard deviation (n − 1 denominator).  `None` for fewer than
/// two values.
pub fn std_dev_sample(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (n - 1.0)).sqrt())
}
