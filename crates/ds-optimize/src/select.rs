//! Picking a fleet size from sweep results.
//!
//! ```text
//! 1. qualify   completion ≥ 80 % and SLA ≥ 75 %
//!              else completion ≥ 80 %, else everything   (→ SelectionTier)
//! 2. cost      sort by cost per order, keep ≤ lowest × 1.10
//! 3. prefer    utilization in [60, 90] %: within 1 point of the highest,
//!              fewest agents wins
//! 4. fallback  cheapest of step 2                          (→ UtilizationBand)
//! ```

use std::fmt;

use crate::ConfigurationResult;

pub const MIN_COMPLETION_RATE: f64 = 0.80;
pub const TARGET_SLA_PCT: f64 = 75.0;
pub const COST_TOLERANCE: f64 = 0.10;
pub const IDEAL_UTILIZATION_MIN_PCT: f64 = 60.0;
pub const IDEAL_UTILIZATION_MAX_PCT: f64 = 90.0;
/// Utilizations this close count as equal; fewer agents then wins.
pub const UTILIZATION_TIE_PCT: f64 = 1.0;

/// Which qualification filter the recommendation came through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionTier {
    /// Met both the completion and the SLA threshold.
    CompletionAndSla,
    /// No configuration met the SLA; completion threshold only.
    CompletionOnly,
    /// Nothing met the completion threshold either.
    Unfiltered,
}

/// Where the recommended configuration's utilization falls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UtilizationBand {
    Under,
    Ideal,
    Over,
}

impl UtilizationBand {
    /// Unknown utilization counts as under.
    pub fn classify(utilization_pct: Option<f64>) -> Self {
        let u = utilization_pct.unwrap_or(0.0);
        if u < IDEAL_UTILIZATION_MIN_PCT {
            UtilizationBand::Under
        } else if u > IDEAL_UTILIZATION_MAX_PCT {
            UtilizationBand::Over
        } else {
            UtilizationBand::Ideal
        }
    }
}

impl fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UtilizationBand::Under => "under-utilized",
            UtilizationBand::Ideal => "within the ideal range",
            UtilizationBand::Over => "over-utilized",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub fleet_size: usize,
    pub tier:       SelectionTier,
    pub band:       UtilizationBand,
    pub result:     ConfigurationResult,
}

/// Apply the selection rule to `results`.  `None` only when `results` is
/// empty.
pub fn select_recommendation(results: &[ConfigurationResult]) -> Option<Recommendation> {
    let completes = |c: &&ConfigurationResult| c.completion_rate >= MIN_COMPLETION_RATE;
    let meets_sla = |c: &&ConfigurationResult| c.sla_pct >= TARGET_SLA_PCT;

    let mut tier = SelectionTier::CompletionAndSla;
    let mut pool: Vec<&ConfigurationResult> = results.iter().filter(completes).filter(meets_sla).collect();
    if pool.is_empty() {
        tier = SelectionTier::CompletionOnly;
        pool = results.iter().filter(completes).collect();
    }
    if pool.is_empty() {
        tier = SelectionTier::Unfiltered;
        pool = results.iter().collect();
    }

    pool.sort_by(|a, b| cost_key(a).total_cmp(&cost_key(b)));
    let lowest = cost_key(pool.first()?);
    let band: Vec<&ConfigurationResult> = pool
        .iter()
        .copied()
        .filter(|c| cost_key(c) <= lowest * (1.0 + COST_TOLERANCE))
        .collect();

    let ideal: Vec<&ConfigurationResult> = band
        .iter()
        .copied()
        .filter(|c| UtilizationBand::classify(c.utilization_pct) == UtilizationBand::Ideal)
        .collect();
    let top = ideal.iter().map(|c| utilization_key(c)).fold(f64::NEG_INFINITY, f64::max);
    let preferred = ideal
        .iter()
        .copied()
        .filter(|c| utilization_key(c) >= top - UTILIZATION_TIE_PCT)
        .min_by(|a, b| {
            a.fleet_size.cmp(&b.fleet_size).then_with(|| utilization_key(b).total_cmp(&utilization_key(a)))
        });

    let chosen = preferred.or_else(|| band.first().copied())?;
    let recommendation = Recommendation {
        fleet_size: chosen.fleet_size,
        tier,
        band: UtilizationBand::classify(chosen.utilization_pct),
        result: chosen.clone(),
    };
    tracing::info!(
        fleet_size = recommendation.fleet_size,
        tier = ?recommendation.tier,
        utilization = %recommendation.band,
        "fleet size recommended"
    );
    Some(recommendation)
}

#[inline]
fn cost_key(c: &ConfigurationResult) -> f64 {
    c.cost_per_order.unwrap_or(f64::INFINITY)
}

#[inline]
fn utilization_key(c: &ConfigurationResult) -> f64 {
    c.utilization_pct.unwrap_or(0.0)
}
