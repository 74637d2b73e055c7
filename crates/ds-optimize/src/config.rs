//! Sweep configuration and batch demand modes.

use ds_core::GeoPoint;
use ds_demand::DemandProfile;
use ds_sim::SimulationParameters;

use crate::{OptimizeError, OptimizeResult};

/// Largest fleet size a sweep will try.
pub const MAX_FLEET_SIZE: usize = 50;
/// Upper bound substituted when the requested one is unusable.
pub const DEFAULT_MAX_AGENTS: usize = 10;

/// How orders arrive during one batch repetition.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchDemand {
    /// Roughly `target_orders` orders per run, inside `radius_km` of the hub.
    ///
    /// Each minute an order appears with probability
    /// `target_orders / max_duration_min` while fewer than `target_orders`
    /// have been generated.  The cap is soft: a run may end below target.
    TargetCount { radius_km: f64, target_orders: u32 },
    /// Each active zone independently fires with probability
    /// `mean_rate / 60` every minute.
    Profile(DemandProfile),
}

impl Default for BatchDemand {
    fn default() -> Self {
        BatchDemand::TargetCount { radius_km: 5.0, target_orders: 50 }
    }
}

/// Everything a workforce sweep needs.
///
/// Agent speeds, handling time, base traffic, cost rates and the seed come
/// from `parameters`; its fleet size, demand profile, order probability,
/// jitter and dynamic-traffic fields are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub min_agents:       usize,
    pub max_agents:       usize,
    pub repetitions:      usize,
    pub max_duration_min: u64,
    /// Deliveries taking at most this long count as within SLA.
    pub sla_target_min:   f64,
    pub demand:           BatchDemand,
    /// Depot the sweep is run for.  `None` uses the city's hub.
    pub hub:              Option<GeoPoint>,
    pub parameters:       SimulationParameters,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_agents:       1,
            max_agents:       DEFAULT_MAX_AGENTS,
            repetitions:      3,
            max_duration_min: 120,
            sla_target_min:   30.0,
            demand:           BatchDemand::default(),
            hub:              None,
            parameters:       SimulationParameters::default(),
        }
    }
}

impl SweepConfig {
    /// Clamp the fleet-size range.
    ///
    /// `min_agents < 1` becomes 1.  A `max_agents` below the minimum or
    /// above [`MAX_FLEET_SIZE`] becomes `min(max(min_agents, 10), 50)`.
    pub fn normalized(mut self) -> Self {
        if self.min_agents < 1 {
            self.min_agents = 1;
        }
        if self.max_agents < self.min_agents || self.max_agents > MAX_FLEET_SIZE {
            self.max_agents = self.min_agents.max(DEFAULT_MAX_AGENTS).min(MAX_FLEET_SIZE);
        }
        self
    }

    pub fn validate(&self) -> OptimizeResult<()> {
        if self.min_agents == 0 || self.min_agents > self.max_agents {
            return Err(OptimizeError::EmptyFleetRange { min: self.min_agents, max: self.max_agents });
        }
        if self.repetitions == 0 {
            return Err(OptimizeError::ZeroRepetitions);
        }
        if self.max_duration_min == 0 {
            return Err(OptimizeError::ZeroDuration);
        }
        if !(self.sla_target_min.is_finite() && self.sla_target_min > 0.0) {
            return Err(OptimizeError::InvalidSlaTarget(self.sla_target_min));
        }
        match &self.demand {
            BatchDemand::TargetCount { radius_km, target_orders } => {
                if !(radius_km.is_finite() && *radius_km > 0.0) {
                    return Err(OptimizeError::InvalidDemand(format!("radius must be positive, got {radius_km}")));
                }
                if *target_orders == 0 {
                    return Err(OptimizeError::InvalidDemand("target order count must be at least 1".into()));
                }
            }
            BatchDemand::Profile(profile) => {
                if profile.zones.is_empty() {
                    return Err(OptimizeError::InvalidDemand(format!("profile `{}` has no zones", profile.name)));
                }
            }
        }
        if let Some(hub) = self.hub {
            if !hub.is_valid() {
                return Err(OptimizeError::InvalidDemand(format!("hub {hub} is not a valid coordinate")));
            }
        }
        self.parameters.validate()?;
        Ok(())
    }

    /// Fleet sizes the sweep walks, ascending.
    pub fn fleet_sizes(&self) -> std::ops::RangeInclusive<usize> {
        self.min_agents..=self.max_agents
    }
}
