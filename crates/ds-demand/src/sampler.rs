//! Order-location sampling.
//!
//! [`OrderLocationSampler`] turns an [`OrderPattern`] plus the current time
//! into a delivery location.  `None` means "no order this tick": no zone was
//! active, or the chosen zone could not be resolved (unknown sectors, empty
//! route).  Callers must not count a `None` as a generated order.
//!
//! Every sampling loop is bounded; when a loop gives up the sampler falls
//! back as documented per pattern rather than failing.

use ds_core::geo::{
    km_to_degrees, sample_disk_point, sample_gaussian_point, sample_in_bbox,
    sample_point_in_polygon, BoundingBox, SAMPLE_ATTEMPTS_PER_POINT,
};
use ds_core::{GeoPoint, SimRng, Tick};

use crate::city::CityMap;
use crate::profile::DemandProfile;
use crate::zone::{Zone, ZoneShape};

/// Disk attempts for the default uniform pattern.
pub const UNIFORM_DISK_ATTEMPTS: usize = 200;
/// Disk attempts for the focused pattern.
pub const FOCUSED_DISK_ATTEMPTS: usize = 100;
pub const HOTSPOT_ATTEMPTS: usize = 100;
pub const SECTOR_ATTEMPTS: usize = 50;
/// Spread around a sector centre, degrees.
pub const SECTOR_SPREAD_DEG: f64 = 0.005;
pub const ROUTE_ATTEMPTS: usize = 50;

/// The demand pattern a run draws order locations from.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderPattern {
    /// Disk around the hub; falls back to anywhere in the city, then the hub.
    Uniform { radius_km: f64 },
    /// Disk around the hub; falls back to the hub.
    Focused { radius_km: f64 },
    /// Zones of a user profile.
    Profile(DemandProfile),
    /// A custom profile was selected but not found; never yields orders.
    Unresolved,
}

/// Draws order locations inside a city for a given hub.
#[derive(Clone, Copy, Debug)]
pub struct OrderLocationSampler<'a> {
    city: &'a CityMap,
    hub:  GeoPoint,
}

impl<'a> OrderLocationSampler<'a> {
    pub fn new(city: &'a CityMap, hub: GeoPoint) -> Self {
        Self { city, hub }
    }

    #[inline]
    pub fn hub(&self) -> GeoPoint {
        self.hub
    }

    /// Location of the next order under `pattern` at time `t`.
    pub fn sample(&self, pattern: &OrderPattern, t: Tick, rng: &mut SimRng) -> Option<GeoPoint> {
        match pattern {
            OrderPattern::Uniform { radius_km } => Some(
                self.disk(*radius_km, UNIFORM_DISK_ATTEMPTS, rng)
                    .unwrap_or_else(|| self.city_wide(rng)),
            ),
            OrderPattern::Focused { radius_km } => Some(self.disk_or_hub(*radius_km, rng)),
            OrderPattern::Profile(profile) => self.sample_profile(profile, t, rng),
            OrderPattern::Unresolved => None,
        }
    }

    /// Pick one active zone by weight and sample inside it.
    pub fn sample_profile(&self, profile: &DemandProfile, t: Tick, rng: &mut SimRng) -> Option<GeoPoint> {
        let active: Vec<&Zone> = profile.active_zones(t).collect();
        let weights: Vec<f64> = active.iter().map(|z| z.selection_weight()).collect();
        let Some(i) = rng.weighted_index(&weights) else {
            tracing::trace!(profile = %profile.name, %t, "no active zone");
            return None;
        };
        let location = self.sample_zone(active[i], rng);
        if location.is_none() {
            tracing::trace!(profile = %profile.name, zone = active[i].shape.kind(), "zone could not be resolved");
        }
        location
    }

    /// One location inside `zone`, ignoring its time window.
    pub fn sample_zone(&self, zone: &Zone, rng: &mut SimRng) -> Option<GeoPoint> {
        let boundary = &self.city.boundary;
        match &zone.shape {
            ZoneShape::Uniform => Some(self.city_wide(rng)),

            ZoneShape::Hotspot { center, spread_km } => {
                let sigma = km_to_degrees(*spread_km);
                Some(sample_gaussian_point(*center, sigma, boundary, HOTSPOT_ATTEMPTS, rng).unwrap_or(*center))
            }

            ZoneShape::Sector { sectors } => {
                let known: Vec<GeoPoint> = sectors
                    .iter()
                    .filter_map(|name| self.city.sector(name))
                    .map(|s| s.location)
                    .collect();
                let center = *rng.choose(&known)?;
                Some(
                    sample_gaussian_point(center, SECTOR_SPREAD_DEG, boundary, SECTOR_ATTEMPTS, rng)
                        .unwrap_or(center),
                )
            }

            ZoneShape::Route { points, spread_km } => {
                let bbox = BoundingBox::from_points(points)?.expanded(km_to_degrees(*spread_km));
                Some(
                    sample_in_bbox(bbox, boundary, ROUTE_ATTEMPTS, rng)
                        .unwrap_or_else(|_| self.city_wide(rng)),
                )
            }
        }
    }

    /// Disk sampling with the focused-pattern budget, falling back to the hub.
    pub fn disk_or_hub(&self, radius_km: f64, rng: &mut SimRng) -> GeoPoint {
        self.disk(radius_km, FOCUSED_DISK_ATTEMPTS, rng).unwrap_or(self.hub)
    }

    fn disk(&self, radius_km: f64, attempts: usize, rng: &mut SimRng) -> Option<GeoPoint> {
        sample_disk_point(self.hub, radius_km, &self.city.boundary, attempts, rng).ok()
    }

    /// Uniform point in the city, or the hub when rejection sampling fails.
    fn city_wide(&self, rng: &mut SimRng) -> GeoPoint {
        sample_point_in_polygon(&self.city.boundary, SAMPLE_ATTEMPTS_PER_POINT, rng).unwrap_or(self.hub)
    }
}
