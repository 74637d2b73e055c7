//! Agent fatigue.
//!
//! Busy agents are sampled every `update_interval_min` minutes and lose
//! `reduction_step` of speed factor while over either workload threshold.
//! Available agents are checked every tick and immediately when they free
//! up.  A fatigued agent (factor below 1) idle for `recovery_idle_min`
//! regains `recovery_step`, its consecutive-delivery count resets, and the
//! idle clock restarts.  Fully rested agents keep their streak.

use ds_core::Tick;

use crate::Agent;

pub const MIN_FATIGUE_FACTOR: f64 = 0.6;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FatigueConfig {
    pub consecutive_deliveries_threshold:  u32,
    pub continuously_active_threshold_min: u64,
    pub reduction_step:                    f64,
    pub min_factor:                        f64,
    pub recovery_idle_min:                 u64,
    pub recovery_step:                     f64,
    pub update_interval_min:               u64,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        Self {
            consecutive_deliveries_threshold:  5,
            continuously_active_threshold_min: 90,
            reduction_step:                    0.1,
            min_factor:                        MIN_FATIGUE_FACTOR,
            recovery_idle_min:                 20,
            recovery_step:                     0.05,
            update_interval_min:               5,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FatigueModel {
    pub config: FatigueConfig,
}

impl FatigueModel {
    pub fn new(config: FatigueConfig) -> Self {
        Self { config }
    }

    /// Per-tick evaluation.  Returns `true` if the factor changed.
    pub fn update(&self, agent: &mut Agent, now: Tick) -> bool {
        if agent.is_available() {
            self.recover(agent, now)
        } else if now.is_multiple_of(self.config.update_interval_min) {
            self.degrade(agent)
        } else {
            false
        }
    }

    /// Evaluation run the moment an agent becomes available.
    #[inline]
    pub fn on_available(&self, agent: &mut Agent, now: Tick) -> bool {
        self.recover(agent, now)
    }

    fn degrade(&self, agent: &mut Agent) -> bool {
        let c = &self.config;
        let overworked = agent.consecutive_deliveries >= c.consecutive_deliveries_threshold
            || agent.time_continuously_active >= c.continuously_active_threshold_min;
        if !overworked || agent.fatigue_factor <= c.min_factor {
            return false;
        }
        agent.fatigue_factor = (agent.fatigue_factor - c.reduction_step).max(c.min_factor);
        true
    }

    fn recover(&self, agent: &mut Agent, now: Tick) -> bool {
        let c = &self.config;
        if agent.fatigue_factor >= 1.0 || now.since(agent.time_became_available_at) < c.recovery_idle_min {
            return false;
        }
        agent.fatigue_factor = (agent.fatigue_factor + c.recovery_step).min(1.0);
        agent.consecutive_deliveries = 0;
        agent.time_became_available_at = now;
        true
    }
}
