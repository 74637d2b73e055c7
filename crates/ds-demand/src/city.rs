//! Static city data: service boundary, default hub, and named sectors.

use ds_core::{GeoPoint, Polygon};

/// A named neighbourhood with an approximate centre, used by sector zones.
#[derive(Clone, Debug, PartialEq)]
pub struct Sector {
    pub name:     String,
    pub location: GeoPoint,
}

/// The operating area of one simulation.
#[derive(Clone, Debug)]
pub struct CityMap {
    /// Service boundary.  Every sampled order location lies inside it.
    pub boundary: Polygon,
    /// Default dark-store location.
    pub hub:      GeoPoint,
    pub sectors:  Vec<Sector>,
}

impl CityMap {
    pub fn new(boundary: Polygon, hub: GeoPoint, sectors: Vec<Sector>) -> Self {
        Self { boundary, hub, sectors }
    }

    /// Chandigarh tricity boundary with the Sector 17 hub.
    pub fn chandigarh() -> Self {
        let sectors = CHANDIGARH_SECTORS
            .iter()
            .map(|&(name, lat, lng)| Sector { name: name.to_owned(), location: GeoPoint::new(lat, lng) })
            .collect();
        Self {
            boundary: Polygon::from_lng_lat_array(&CHANDIGARH_BOUNDARY),
            hub:      CHANDIGARH_HUB,
            sectors,
        }
    }

    /// Exact-name sector lookup.
    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.name == name)
    }
}

impl Default for CityMap {
    fn default() -> Self {
        Self::chandigarh()
    }
}

// ── Chandigarh data ───────────────────────────────────────────────────────────

pub const CHANDIGARH_HUB: GeoPoint = GeoPoint::new(30.7333, 76.7794);

/// Boundary ring as `[lng, lat]`, closed.
pub const CHANDIGARH_BOUNDARY: [[f64; 2]; 17] = [
    [76.6827, 30.7683], [76.7031, 30.7925], [76.7327, 30.8067], [76.7639, 30.8105],
    [76.7958, 30.8063], [76.8234, 30.7909], [76.8404, 30.7688], [76.8468, 30.7406],
    [76.8397, 30.7123], [76.8227, 30.6882], [76.7915, 30.6693], [76.7624, 30.6635],
    [76.7312, 30.6698], [76.7000, 30.6861], [76.6789, 30.7153], [76.6765, 30.7432],
    [76.6827, 30.7683],
];

/// (name, lat, lng) of approximate sector centres.
pub const CHANDIGARH_SECTORS: &[(&str, f64, f64)] = &[
    ("Sector 1 (Capitol Complex)", 30.742, 76.784),
    ("Sector 2", 30.749, 76.790),
    ("Sector 3", 30.745, 76.794),
    ("Sector 4", 30.750, 76.799),
    ("Sector 5", 30.755, 76.804),
    ("Sector 6", 30.762, 76.809),
    ("Sector 7", 30.738, 76.799),
    ("Sector 8", 30.742, 76.804),
    ("Sector 9", 30.736, 76.788),
    ("Sector 10", 30.739, 76.784),
    ("Sector 11", 30.744, 76.778),
    ("Sector 12 (PGIMER)", 30.758, 76.767),
    ("Sector 14 (Panjab University)", 30.755, 76.760),
    ("Sector 15", 30.749, 76.772),
    ("Sector 16", 30.738, 76.778),
    ("Sector 17 (City Center)", 30.733, 76.781),
    ("Sector 18", 30.730, 76.790),
    ("Sector 19", 30.725, 76.795),
    ("Sector 20", 30.720, 76.800),
    ("Sector 21", 30.716, 76.793),
    ("Sector 22", 30.730, 76.774),
    ("Sector 23", 30.740, 76.765),
    ("Sector 24", 30.749, 76.758),
    ("Sector 25", 30.755, 76.750),
    ("Sector 26 (Grain Market)", 30.735, 76.805),
    ("Sector 27", 30.720, 76.787),
    ("Sector 28", 30.715, 76.782),
    ("Sector 29", 30.708, 76.788),
    ("Sector 30", 30.704, 76.781),
    ("Sector 31", 30.698, 76.795),
    ("Sector 32", 30.710, 76.775),
    ("Sector 33", 30.718, 76.770),
    ("Sector 34", 30.725, 76.765),
    ("Sector 35", 30.730, 76.760),
    ("Sector 36", 30.738, 76.755),
    ("Sector 37", 30.745, 76.750),
    ("Sector 38", 30.750, 76.743),
    ("Sector 38 West", 30.748, 76.735),
    ("Sector 39", 30.760, 76.738),
    ("Sector 40", 30.755, 76.730),
    ("Sector 41", 30.748, 76.725),
    ("Sector 42", 30.735, 76.748),
    ("Sector 43 (ISBT)", 30.728, 76.755),
    ("Sector 44", 30.720, 76.760),
    ("Sector 45", 30.715, 76.765),
    ("Sector 46", 30.708, 76.770),
    ("Sector 47", 30.700, 76.775),
    ("Sector 48", 30.690, 76.765),
    ("Sector 49", 30.695, 76.755),
    ("Sector 50", 30.705, 76.750),
    ("Sector 51", 30.715, 76.745),
    ("Sector 52", 30.725, 76.740),
    ("Sector 53", 30.700, 76.730),
    ("Sector 54 (Mohali)", 30.690, 76.720),
    ("Sector 55", 30.730, 76.725),
    ("Sector 56", 30.740, 76.720),
    ("Industrial Area Phase 1", 30.710, 76.790),
    ("Industrial Area Phase 2", 30.695, 76.780),
    ("Manimajra", 30.725, 76.835),
    ("Dhanas", 30.760, 76.720),
];
