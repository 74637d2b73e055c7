//! Route planning.
//!
//! There is no road network: a route is a straight polyline between two
//! points, optionally bent through jittered waypoints.  The planner is a
//! trait so the movement engine and dispatch can be shared between the
//! interactive driver ([`WaypointPlanner`]) and the batch sweep
//! ([`DirectPlanner`]).

use ds_core::geo::generate_waypoints;
use ds_core::{GeoPoint, SimRng};

/// Pluggable route builder.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so batch units can share one
/// planner across Rayon workers.
pub trait RoutePlanner: Send + Sync {
    /// Polyline from `from` to `to`, both endpoints included, so the result
    /// always has at least two points.
    fn plan(&self, from: GeoPoint, to: GeoPoint, rng: &mut SimRng) -> Vec<GeoPoint>;
}

/// Two-point legs, no randomness.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectPlanner;

impl RoutePlanner for DirectPlanner {
    fn plan(&self, from: GeoPoint, to: GeoPoint, _rng: &mut SimRng) -> Vec<GeoPoint> {
        vec![from, to]
    }
}

/// Legs split by `waypoints` jittered interior points.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaypointPlanner {
    pub waypoints: usize,
}

impl WaypointPlanner {
    pub fn new(waypoints: usize) -> Self {
        Self { waypoints }
    }
}

impl RoutePlanner for WaypointPlanner {
    fn plan(&self, from: GeoPoint, to: GeoPoint, rng: &mut SimRng) -> Vec<GeoPoint> {
        let mid = generate_waypoints(from, to, self.waypoints, rng);
        let mut route = Vec::with_capacity(mid.len() + 2);
        route.push(from);
        route.extend(mid);
        route.push(to);
        route
    }
}

impl<P: RoutePlanner + ?Sized> RoutePlanner for &P {
    fn plan(&self, from: GeoPoint, to: GeoPoint, rng: &mut SimRng) -> Vec<GeoPoint> {
        (**self).plan(from, to, rng)
    }
}

impl<P: RoutePlanner + ?Sized> RoutePlanner for Box<P> {
    fn plan(&self, from: GeoPoint, to: GeoPoint, rng: &mut SimRng) -> Vec<GeoPoint> {
        (**self).plan(from, to, rng)
    }
}
