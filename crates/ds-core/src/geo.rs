//! Geographic coordinates, polygon tests, and random point sampling.
//!
//! `GeoPoint` uses `f64` latitude/longitude: delivery timing is derived from
//! distances of a few hundred metres, and the end-to-end timing of a single
//! order must be reproducible to well below a second.
//!
//! Polygons are rings of vertices in (lng, lat) order as far as the
//! ray-casting test is concerned; `Polygon::from_lng_lat` accepts the usual
//! GeoJSON `[lng, lat]` pairs.
//!
//! All samplers are bounded rejection loops.  Multi-point forms return as
//! many points as they found; single-point forms return
//! `Err(SamplingExhausted)`.

use std::fmt;

use crate::{CoreError, CoreResult, SamplingExhausted, SimRng};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Rough kilometres per degree, used to turn spreads and radii into degrees.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Attempt budget per requested point for the multi-point samplers.
pub const SAMPLE_ATTEMPTS_PER_POINT: usize = 500;

/// Legs shorter than this get no intermediate waypoints.
pub const MIN_WAYPOINT_LEG_KM: f64 = 0.2;

/// Upper bound on waypoint jitter, in degrees.
pub const MAX_WAYPOINT_JITTER_DEG: f64 = 0.005;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Linear interpolation in degree space; `t = 0` is `self`, `t = 1` is
    /// `other`.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }

    #[inline]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> GeoPoint {
        GeoPoint { lat: self.lat + d_lat, lng: self.lng + d_lng }
    }

    /// `true` when both coordinates are finite and within WGS-84 range.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Convert a distance in kilometres to the approximate degree span used by
/// all samplers.
#[inline]
pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

// ── BoundingBox ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Smallest box containing every point.  `None` for an empty slice.
    pub fn from_points(points: &[GeoPoint]) -> Option<BoundingBox> {
        if points.is_empty() {
            return None;
        }
        Some(ring_bbox(points))
    }

    /// Grow the box by `deg` on every side.
    pub fn expanded(self, deg: f64) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat - deg,
            max_lat: self.max_lat + deg,
            min_lng: self.min_lng - deg,
            max_lng: self.max_lng + deg,
        }
    }

    #[inline]
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lng >= self.min_lng && p.lng <= self.max_lng
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) * 0.5,
            (self.min_lng + self.max_lng) * 0.5,
        )
    }

    /// Uniform point inside the box.
    #[inline]
    pub fn sample(&self, rng: &mut SimRng) -> GeoPoint {
        GeoPoint::new(
            rng.uniform(self.min_lat, self.max_lat),
            rng.uniform(self.min_lng, self.max_lng),
        )
    }
}

// ── Polygon ───────────────────────────────────────────────────────────────────

/// A simple closed polygon with a cached bounding box.
///
/// The ring may or may not repeat its first vertex at the end; the
/// ray-casting test treats both forms identically.
#[derive(Clone, Debug)]
pub struct Polygon {
    ring: Vec<GeoPoint>,
    bbox: BoundingBox,
}

impl Polygon {
    /// Fails when the ring has fewer than three vertices.
    pub fn new(ring: Vec<GeoPoint>) -> CoreResult<Polygon> {
        if ring.len() < 3 {
            return Err(CoreError::DegeneratePolygon(ring.len()));
        }
        if let Some(bad) = ring.iter().find(|p| !p.is_valid()) {
            return Err(CoreError::InvalidCoordinate { lat: bad.lat, lng: bad.lng });
        }
        let bbox = ring_bbox(&ring);
        Ok(Polygon { ring, bbox })
    }

    /// Build from GeoJSON-style `[lng, lat]` pairs.
    pub fn from_lng_lat(coords: &[[f64; 2]]) -> CoreResult<Polygon> {
        Polygon::new(coords.iter().map(|&[lng, lat]| GeoPoint::new(lat, lng)).collect())
    }

    /// Like [`Polygon::from_lng_lat`] for fixed-size tables; the vertex
    /// count is checked at compile time.
    pub fn from_lng_lat_array<const N: usize>(coords: &[[f64; 2]; N]) -> Polygon {
        const { assert!(N >= 3, "polygon needs at least 3 vertices") };
        let ring: Vec<GeoPoint> = coords.iter().map(|&[lng, lat]| GeoPoint::new(lat, lng)).collect();
        let bbox = ring_bbox(&ring);
        Polygon { ring, bbox }
    }

    #[inline]
    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    #[inline]
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    #[inline]
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.bbox.contains(point) && point_in_polygon(point, &self.ring)
    }
}

/// Bounding box of a ring known to be non-empty.
fn ring_bbox(ring: &[GeoPoint]) -> BoundingBox {
    let first = ring[0];
    ring[1..].iter().fold(
        BoundingBox { min_lat: first.lat, max_lat: first.lat, min_lng: first.lng, max_lng: first.lng },
        |b, p| BoundingBox {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lng: b.min_lng.min(p.lng),
            max_lng: b.max_lng.max(p.lng),
        },
    )
}

/// Ray-casting point-in-polygon test over a ring of vertices.
///
/// Uses longitude as x and latitude as y.  Points exactly on an edge may
/// land on either side.
pub fn point_in_polygon(point: GeoPoint, ring: &[GeoPoint]) -> bool {
    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = match ring.len() {
        0 => return false,
        n => n - 1,
    };
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lng, ring[i].lat);
        let (xj, yj) = (ring[j].lng, ring[j].lat);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ── Sampling ──────────────────────────────────────────────────────────────────

/// Up to `n` points drawn uniformly inside `polygon`.
///
/// Gives up after `n * SAMPLE_ATTEMPTS_PER_POINT` draws; a short result is
/// normal for thin polygons and callers must accept it.
pub fn sample_uniform_in_polygon(n: usize, polygon: &Polygon, rng: &mut SimRng) -> Vec<GeoPoint> {
    let budget = n.saturating_mul(SAMPLE_ATTEMPTS_PER_POINT);
    let bbox = polygon.bbox();
    let mut out = Vec::with_capacity(n);
    for _ in 0..budget {
        if out.len() == n {
            break;
        }
        let p = bbox.sample(rng);
        if polygon.contains(p) {
            out.push(p);
        }
    }
    out
}

/// Up to `n` points drawn from a 2-D normal around `center` (σ in degrees
/// on both axes), keeping only those inside `polygon`.
pub fn sample_gaussian_in_polygon(
    center:    GeoPoint,
    sigma_deg: f64,
    n:         usize,
    polygon:   &Polygon,
    rng:       &mut SimRng,
) -> Vec<GeoPoint> {
    let budget = n.saturating_mul(SAMPLE_ATTEMPTS_PER_POINT);
    let mut out = Vec::with_capacity(n);
    let mut attempts = 0;
    while out.len() < n && attempts < budget {
        let (z0, z1) = rng.standard_normal_pair();
        attempts += 1;
        let p = center.offset(z0 * sigma_deg, z1 * sigma_deg);
        if polygon.contains(p) {
            out.push(p);
        }
    }
    out
}

/// One uniform point inside `polygon` within `max_attempts` draws.
pub fn sample_point_in_polygon(
    polygon:      &Polygon,
    max_attempts: usize,
    rng:          &mut SimRng,
) -> Result<GeoPoint, SamplingExhausted> {
    sample_in_bbox(polygon.bbox(), polygon, max_attempts, rng)
}

/// One uniform point inside `bbox` that also lies inside `polygon`.
pub fn sample_in_bbox(
    bbox:         BoundingBox,
    polygon:      &Polygon,
    max_attempts: usize,
    rng:          &mut SimRng,
) -> Result<GeoPoint, SamplingExhausted> {
    for _ in 0..max_attempts {
        let p = bbox.sample(rng);
        if polygon.contains(p) {
            return Ok(p);
        }
    }
    Err(SamplingExhausted { attempts: max_attempts })
}

/// One Gaussian point around `center` inside `polygon`.
pub fn sample_gaussian_point(
    center:       GeoPoint,
    sigma_deg:    f64,
    polygon:      &Polygon,
    max_attempts: usize,
    rng:          &mut SimRng,
) -> Result<GeoPoint, SamplingExhausted> {
    for _ in 0..max_attempts {
        let (z0, z1) = rng.standard_normal_pair();
        let p = center.offset(z0 * sigma_deg, z1 * sigma_deg);
        if polygon.contains(p) {
            return Ok(p);
        }
    }
    Err(SamplingExhausted { attempts: max_attempts })
}

/// One area-uniform point in a disk of `radius_km` around `center` that also
/// lies inside `polygon`.
///
/// Polar sampling: angle uniform, radius `sqrt(u) * R`.
pub fn sample_disk_point(
    center:       GeoPoint,
    radius_km:    f64,
    polygon:      &Polygon,
    max_attempts: usize,
    rng:          &mut SimRng,
) -> Result<GeoPoint, SamplingExhausted> {
    let radius_deg = km_to_degrees(radius_km);
    for _ in 0..max_attempts {
        let angle = rng.random::<f64>() * std::f64::consts::TAU;
        let r = rng.random::<f64>().sqrt() * radius_deg;
        let p = center.offset(r * angle.sin(), r * angle.cos());
        if polygon.contains(p) {
            return Ok(p);
        }
    }
    Err(SamplingExhausted { attempts: max_attempts })
}

// ── Waypoints ─────────────────────────────────────────────────────────────────

/// `k` interior points between `start` and `end`, evenly spaced and
/// jittered by at most `min(0.005°, 0.0001° × leg_km)` on each axis.
///
/// Empty when `k == 0` or the leg is shorter than 0.2 km.
pub fn generate_waypoints(start: GeoPoint, end: GeoPoint, k: usize, rng: &mut SimRng) -> Vec<GeoPoint> {
    let leg_km = start.distance_km(end);
    if k == 0 || leg_km < MIN_WAYPOINT_LEG_KM {
        return Vec::new();
    }
    let max_offset = MAX_WAYPOINT_JITTER_DEG.min(leg_km * 0.0001);
    (1..=k)
        .map(|i| {
            let mid = start.lerp(end, i as f64 / (k + 1) as f64);
            let d_lng = rng.symmetric(max_offset);
            let d_lat = rng.symmetric(max_offset);
            mid.offset(d_lat, d_lng)
        })
        .collect()
}
