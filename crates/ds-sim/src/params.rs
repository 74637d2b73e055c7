//! Run parameters and the string-keyed setter used by front ends.
//!
//! A [`Simulation`][crate::Simulation] keeps one configured
//! `SimulationParameters` value.  Edits go through [`SimulationParameters::set`]
//! and take effect at the next reset, when the world copies a snapshot.

use std::fmt;

use ds_demand::{OrderPattern, ProfileCatalog, ProfileId};

use crate::ConfigError;

/// `order_frequency_level` 1..=5 → per-minute order probability.
pub const ORDER_FREQUENCY_LEVELS: [f64; 5] = [0.15, 0.25, 0.40, 0.55, 0.70];

// ── ParamValue ────────────────────────────────────────────────────────────────

/// Untyped value coming from a form field or a config line.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Text(v) => f.write_str(v),
        }
    }
}

// ── CostRates ─────────────────────────────────────────────────────────────────

/// The three cost coefficients, shared by both drivers.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostRates {
    pub agent_cost_per_hour:     f64,
    pub cost_per_km:             f64,
    pub fixed_cost_per_delivery: f64,
}

// ── SimulationParameters ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParameters {
    pub num_agents:              usize,
    pub agent_min_speed_kmph:    f64,
    pub agent_max_speed_kmph:    f64,
    pub handling_time_min:       f64,
    pub demand_profile:          ProfileId,
    pub uniform_order_radius_km: f64,
    pub focused_order_radius_km: f64,
    /// Interior waypoints per route leg in the interactive driver.
    pub route_waypoints:         usize,
    pub base_traffic_factor:     f64,
    pub dynamic_traffic:         bool,
    pub agent_cost_per_hour:     f64,
    pub cost_per_km:             f64,
    pub fixed_cost_per_delivery: f64,
    /// Chance of one order attempt per simulated minute.
    pub order_probability:       f64,
    /// Half-width of the square agents spawn in around the hub, degrees.
    pub spawn_jitter_deg:        f64,
    pub seed:                    u64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            num_agents:              5,
            agent_min_speed_kmph:    20.0,
            agent_max_speed_kmph:    30.0,
            handling_time_min:       5.0,
            demand_profile:          ProfileId::DefaultUniform,
            uniform_order_radius_km: 5.0,
            focused_order_radius_km: 3.0,
            route_waypoints:         1,
            base_traffic_factor:     1.0,
            dynamic_traffic:         false,
            agent_cost_per_hour:     150.0,
            cost_per_km:             5.0,
            fixed_cost_per_delivery: 10.0,
            order_probability:       0.40,
            spawn_jitter_deg:        0.001,
            seed:                    42,
        }
    }
}

impl SimulationParameters {
    /// Apply one edit.  On error nothing changes.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) -> Result<(), ConfigError> {
        let value = value.into();
        match key {
            "num_agents" => self.num_agents = integer("num_agents", &value, 1, 500)? as usize,
            "agent_min_speed_kmph" => self.agent_min_speed_kmph = speed("agent_min_speed_kmph", &value)?,
            "agent_max_speed_kmph" => self.agent_max_speed_kmph = speed("agent_max_speed_kmph", &value)?,
            "handling_time_min" => {
                self.handling_time_min = closed("handling_time_min", &value, 0.0, 240.0, "[0, 240]")?;
            }
            "demand_profile" => {
                let text = text("demand_profile", &value)?;
                self.demand_profile =
                    text.parse().map_err(|_| ConfigError::UnknownProfile(text.to_owned()))?;
            }
            "uniform_order_radius_km" => self.uniform_order_radius_km = radius("uniform_order_radius_km", &value)?,
            "focused_order_radius_km" => self.focused_order_radius_km = radius("focused_order_radius_km", &value)?,
            "route_waypoints" => self.route_waypoints = integer("route_waypoints", &value, 0, 10)? as usize,
            "base_traffic_factor" => {
                self.base_traffic_factor = positive("base_traffic_factor", &value, 5.0, "(0, 5]")?;
            }
            "dynamic_traffic" => self.dynamic_traffic = boolean("dynamic_traffic", &value)?,
            "agent_cost_per_hour" => self.agent_cost_per_hour = non_negative("agent_cost_per_hour", &value)?,
            "cost_per_km" => self.cost_per_km = non_negative("cost_per_km", &value)?,
            "fixed_cost_per_delivery" => {
                self.fixed_cost_per_delivery = non_negative("fixed_cost_per_delivery", &value)?;
            }
            "order_probability" => {
                self.order_probability = closed("order_probability", &value, 0.0, 1.0, "[0, 1]")?;
            }
            "order_frequency_level" => {
                let level = integer("order_frequency_level", &value, 1, 5)?;
                self.order_probability = ORDER_FREQUENCY_LEVELS[level as usize - 1];
            }
            "spawn_jitter_deg" => {
                self.spawn_jitter_deg = closed("spawn_jitter_deg", &value, 0.0, 0.05, "[0, 0.05]")?;
            }
            "seed" => self.seed = seed(&value)?,
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        }
        Ok(())
    }

    /// Check every field against the ranges [`set`][Self::set] enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        use ParamValue::Number as N;
        integer("num_agents", &N(self.num_agents as f64), 1, 500)?;
        speed("agent_min_speed_kmph", &N(self.agent_min_speed_kmph))?;
        speed("agent_max_speed_kmph", &N(self.agent_max_speed_kmph))?;
        closed("handling_time_min", &N(self.handling_time_min), 0.0, 240.0, "[0, 240]")?;
        radius("uniform_order_radius_km", &N(self.uniform_order_radius_km))?;
        radius("focused_order_radius_km", &N(self.focused_order_radius_km))?;
        integer("route_waypoints", &N(self.route_waypoints as f64), 0, 10)?;
        positive("base_traffic_factor", &N(self.base_traffic_factor), 5.0, "(0, 5]")?;
        non_negative("agent_cost_per_hour", &N(self.agent_cost_per_hour))?;
        non_negative("cost_per_km", &N(self.cost_per_km))?;
        non_negative("fixed_cost_per_delivery", &N(self.fixed_cost_per_delivery))?;
        closed("order_probability", &N(self.order_probability), 0.0, 1.0, "[0, 1]")?;
        closed("spawn_jitter_deg", &N(self.spawn_jitter_deg), 0.0, 0.05, "[0, 0.05]")?;
        Ok(())
    }

    /// Frequency level whose probability matches `order_probability`, if any.
    pub fn order_frequency_level(&self) -> Option<u8> {
        ORDER_FREQUENCY_LEVELS
            .iter()
            .position(|&p| (p - self.order_probability).abs() < 1e-9)
            .map(|i| i as u8 + 1)
    }

    pub fn cost_rates(&self) -> CostRates {
        CostRates {
            agent_cost_per_hour:     self.agent_cost_per_hour,
            cost_per_km:             self.cost_per_km,
            fixed_cost_per_delivery: self.fixed_cost_per_delivery,
        }
    }

    /// Speed range agents are drawn from.  An inverted range collapses to
    /// the minimum.
    pub fn speed_range(&self) -> (f64, f64) {
        if self.agent_min_speed_kmph > self.agent_max_speed_kmph {
            (self.agent_min_speed_kmph, self.agent_min_speed_kmph)
        } else {
            (self.agent_min_speed_kmph, self.agent_max_speed_kmph)
        }
    }

    /// Resolve `demand_profile` against `catalog`.
    pub fn order_pattern(&self, catalog: &ProfileCatalog) -> OrderPattern {
        match &self.demand_profile {
            ProfileId::DefaultUniform => OrderPattern::Uniform { radius_km: self.uniform_order_radius_km },
            ProfileId::DefaultFocused => OrderPattern::Focused { radius_km: self.focused_order_radius_km },
            ProfileId::Custom(name) => match catalog.get(name) {
                Some(profile) => OrderPattern::Profile(profile.clone()),
                None => {
                    tracing::warn!(profile = %name, "custom demand profile not found; no orders will be generated");
                    OrderPattern::Unresolved
                }
            },
        }
    }
}

// ── Value coercion ────────────────────────────────────────────────────────────

fn number(key: &'static str, v: &ParamValue) -> Result<f64, ConfigError> {
    match v {
        ParamValue::Number(x) if x.is_finite() => Ok(*x),
        ParamValue::Number(_) => Err(ConfigError::WrongType { key, expected: "a finite number" }),
        ParamValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or(ConfigError::WrongType { key, expected: "a number" }),
        ParamValue::Bool(_) => Err(ConfigError::WrongType { key, expected: "a number" }),
    }
}

fn integer(key: &'static str, v: &ParamValue, lo: u64, hi: u64) -> Result<u64, ConfigError> {
    let x = number(key, v)?;
    if x.fract() != 0.0 {
        return Err(ConfigError::WrongType { key, expected: "an integer" });
    }
    if x < lo as f64 || x > hi as f64 {
        let range = match key {
            "num_agents" => "1..=500",
            "route_waypoints" => "0..=10",
            "order_frequency_level" => "1..=5",
            _ => "the unsigned 64-bit range",
        };
        return Err(ConfigError::OutOfRange { key, value: x, range });
    }
    Ok(x as u64)
}

/// Seeds above 2^53 only survive as text.
fn seed(v: &ParamValue) -> Result<u64, ConfigError> {
    match v {
        ParamValue::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::WrongType { key: "seed", expected: "an unsigned integer" }),
        other => integer("seed", other, 0, u64::MAX),
    }
}

fn closed(key: &'static str, v: &ParamValue, lo: f64, hi: f64, range: &'static str) -> Result<f64, ConfigError> {
    let x = number(key, v)?;
    if x < lo || x > hi {
        return Err(ConfigError::OutOfRange { key, value: x, range });
    }
    Ok(x)
}

fn positive(key: &'static str, v: &ParamValue, hi: f64, range: &'static str) -> Result<f64, ConfigError> {
    let x = number(key, v)?;
    if x <= 0.0 || x > hi {
        return Err(ConfigError::OutOfRange { key, value: x, range });
    }
    Ok(x)
}

#[inline]
fn speed(key: &'static str, v: &ParamValue) -> Result<f64, ConfigError> {
    positive(key, v, 200.0, "(0, 200]")
}

#[inline]
fn radius(key: &'static str, v: &ParamValue) -> Result<f64, ConfigError> {
    positive(key, v, 50.0, "(0, 50]")
}

fn non_negative(key: &'static str, v: &ParamValue) -> Result<f64, ConfigError> {
    let x = number(key, v)?;
    if x < 0.0 {
        return Err(ConfigError::OutOfRange { key, value: x, range: "[0, inf)" });
    }
    Ok(x)
}

fn boolean(key: &'static str, v: &ParamValue) -> Result<bool, ConfigError> {
    match v {
        ParamValue::Bool(b) => Ok(*b),
        ParamValue::Text(s) => match s.trim() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" => Ok(false),
            _ => Err(ConfigError::WrongType { key, expected: "a boolean" }),
        },
        ParamValue::Number(_) => Err(ConfigError::WrongType { key, expected: "a boolean" }),
    }
}

fn text<'v>(key: &'static str, v: &'v ParamValue) -> Result<&'v str, ConfigError> {
    match v {
        ParamValue::Text(s) => Ok(s.as_str()),
        _ => Err(ConfigError::WrongType { key, expected: "a profile id string" }),
    }
}
