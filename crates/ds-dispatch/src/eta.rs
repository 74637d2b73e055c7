//! Time-of-arrival estimate used to rank agents.

use ds_core::GeoPoint;

/// Minutes until `order_location` is reached by an agent at `agent_location`
/// that must first collect the parcel at `hub`:
///
/// ```text
/// (d(agent, hub) + d(hub, order)) / (speed × traffic) × 60 + handling
/// ```
///
/// Returns `f64::INFINITY` for a non-positive speed or traffic factor so
/// such an agent never wins a comparison.
pub fn estimate_eta(
    agent_location:    GeoPoint,
    effective_speed:   f64,
    order_location:    GeoPoint,
    hub:               GeoPoint,
    traffic_factor:    f64,
    handling_time_min: f64,
) -> f64 {
    eta_from_legs(
        agent_location.distance_km(hub),
        hub.distance_km(order_location),
        effective_speed,
        traffic_factor,
        handling_time_min,
    )
}

/// Same estimate from precomputed leg lengths, km.
#[inline]
pub fn eta_from_legs(to_hub_km: f64, to_customer_km: f64, speed: f64, traffic: f64, handling: f64) -> f64 {
    let kmph = speed * traffic;
    if !(kmph > 0.0) {
        return f64::INFINITY;
    }
    (to_hub_km + to_customer_km) / kmph * 60.0 + handling
}
