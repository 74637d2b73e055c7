//! Demand zones.
//!
//! A zone says *where* orders appear (its [`ZoneShape`]), *how many* per
//! hour (`min_orders..=max_orders`), and *when* (`start_time..=end_time`,
//! minutes from the start of the run, `end_time = None` meaning open-ended).
//!
//! JSON form (the `type` tag selects the shape):
//!
//! ```json
//! { "type": "hotspot", "center": { "lat": 30.73, "lng": 76.78 }, "spread_km": 1.5,
//!   "min_orders": 4, "max_orders": 8, "start_time": 0, "end_time": 120 }
//! ```

use serde::{Deserialize, Serialize};

use ds_core::{GeoPoint, Tick};

/// Hotspot spread used when a zone does not give one.
pub const DEFAULT_HOTSPOT_SPREAD_KM: f64 = 1.0;

/// Route corridor half-width used when a zone does not give one.
pub const DEFAULT_ROUTE_SPREAD_KM: f64 = 0.5;

fn default_hotspot_spread() -> f64 {
    DEFAULT_HOTSPOT_SPREAD_KM
}

fn default_route_spread() -> f64 {
    DEFAULT_ROUTE_SPREAD_KM
}

/// Where a zone places its orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ZoneShape {
    /// Anywhere inside the city boundary.
    Uniform,
    /// Normally distributed around `center`.
    Hotspot {
        center:    GeoPoint,
        #[serde(default = "default_hotspot_spread")]
        spread_km: f64,
    },
    /// Around one of the named sectors, picked uniformly per order.
    Sector {
        sectors: Vec<String>,
    },
    /// Inside the bounding box of a polyline, widened by `spread_km`.
    Route {
        points:    Vec<GeoPoint>,
        #[serde(default = "default_route_spread")]
        spread_km: f64,
    },
}

impl ZoneShape {
    pub fn kind(&self) -> &'static str {
        match self {
            ZoneShape::Uniform => "uniform",
            ZoneShape::Hotspot { .. } => "hotspot",
            ZoneShape::Sector { .. } => "sector",
            ZoneShape::Route { .. } => "route",
        }
    }
}

/// One entry of a demand profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(flatten)]
    pub shape:      ZoneShape,
    /// Lower bound of the order rate, orders per hour.
    #[serde(default)]
    pub min_orders: f64,
    /// Upper bound of the order rate, orders per hour.
    #[serde(default)]
    pub max_orders: f64,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub end_time:   Option<u64>,
}

impl Zone {
    pub fn new(shape: ZoneShape) -> Self {
        Self { shape, min_orders: 0.0, max_orders: 0.0, start_time: 0, end_time: None }
    }

    pub fn with_rate(mut self, min_orders: f64, max_orders: f64) -> Self {
        self.min_orders = min_orders;
        self.max_orders = max_orders;
        self
    }

    pub fn with_window(mut self, start_time: u64, end_time: Option<u64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// `true` while `start_time <= t <= end_time`.
    #[inline]
    pub fn is_active(&self, t: Tick) -> bool {
        t.0 >= self.start_time && self.end_time.is_none_or(|end| t.0 <= end)
    }

    /// Midpoint of the rate range, orders per hour.
    #[inline]
    pub fn mean_rate(&self) -> f64 {
        (self.min_orders + self.max_orders) * 0.5
    }

    /// Weight used when picking among active zones: the mean rate, or 1 when
    /// the zone gives no rate at all.
    pub fn selection_weight(&self) -> f64 {
        if self.min_orders == 0.0 && self.max_orders == 0.0 {
            1.0
        } else {
            self.mean_rate().max(0.0)
        }
    }

    /// `true` when the zone has a finite end time.
    #[inline]
    pub fn is_bounded(&self) -> bool {
        self.end_time.is_some()
    }
}
