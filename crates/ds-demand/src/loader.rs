//! Demand-profile loaders.
//!
//! # JSON format
//!
//! A list of profiles, each a name plus the zone objects described in
//! [`crate::zone`]:
//!
//! ```json
//! [ { "name": "lunch_rush",
//!     "zones": [ { "type": "uniform", "min_orders": 2, "max_orders": 4 } ] } ]
//! ```
//!
//! # CSV format
//!
//! One row per zone; rows sharing `profile` form one profile, in file order.
//!
//! ```csv
//! profile,type,min_orders,max_orders,start_time,end_time,center_lat,center_lng,spread_km,sectors,route
//! lunch,hotspot,4,8,0,120,30.733,76.781,1.5,,
//! lunch,sector,1,3,60,,,,,Sector 22;Sector 35,
//! lunch,route,2,2,0,,,,0.4,,30.70:76.75;30.76:76.80
//! ```
//!
//! | Column       | Used by            | Notes                                  |
//! |--------------|--------------------|----------------------------------------|
//! | `center_*`   | hotspot            | required                               |
//! | `spread_km`  | hotspot, route     | defaults 1.0 / 0.5                     |
//! | `sectors`    | sector             | `;`-separated sector names             |
//! | `route`      | route              | `;`-separated `lat:lng` pairs          |
//! | `end_time`   | all                | empty means open-ended                 |

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ds_core::GeoPoint;

use crate::profile::{DemandProfile, ProfileCatalog};
use crate::zone::{Zone, ZoneShape, DEFAULT_HOTSPOT_SPREAD_KM, DEFAULT_ROUTE_SPREAD_KM};
use crate::{DemandError, DemandResult};

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Load a profile catalog from a JSON file.
pub fn load_profiles_json(path: &Path) -> DemandResult<ProfileCatalog> {
    let file = std::fs::File::open(path)?;
    load_profiles_json_reader(file)
}

/// Like [`load_profiles_json`] but accepts any `Read` source.
pub fn load_profiles_json_reader<R: Read>(reader: R) -> DemandResult<ProfileCatalog> {
    let profiles: Vec<DemandProfile> = serde_json::from_reader(reader)?;
    Ok(profiles.into_iter().collect())
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ZoneRecord {
    profile:    String,
    #[serde(rename = "type")]
    kind:       String,
    min_orders: Option<f64>,
    max_orders: Option<f64>,
    start_time: Option<u64>,
    end_time:   Option<u64>,
    center_lat: Option<f64>,
    center_lng: Option<f64>,
    spread_km:  Option<f64>,
    sectors:    Option<String>,
    route:      Option<String>,
}

/// Load a profile catalog from a CSV file.
pub fn load_profiles_csv(path: &Path) -> DemandResult<ProfileCatalog> {
    let file = std::fs::File::open(path)?;
    load_profiles_csv_reader(file)
}

/// Like [`load_profiles_csv`] but accepts any `Read` source.
pub fn load_profiles_csv_reader<R: Read>(reader: R) -> DemandResult<ProfileCatalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut profiles: Vec<DemandProfile> = Vec::new();

    for result in csv_reader.deserialize::<ZoneRecord>() {
        let row = result.map_err(|e| DemandError::Parse(e.to_string()))?;
        let zone = zone_from_record(&row)?;
        match profiles.iter_mut().find(|p| p.name == row.profile) {
            Some(p) => p.zones.push(zone),
            None => profiles.push(DemandProfile::new(row.profile, vec![zone])),
        }
    }

    Ok(profiles.into_iter().collect())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn zone_from_record(row: &ZoneRecord) -> DemandResult<Zone> {
    let missing = |field: &'static str| DemandError::MissingField { profile: row.profile.clone(), field };

    let shape = match row.kind.trim() {
        "uniform" => ZoneShape::Uniform,
        "hotspot" => ZoneShape::Hotspot {
            center:    GeoPoint::new(
                row.center_lat.ok_or_else(|| missing("center_lat"))?,
                row.center_lng.ok_or_else(|| missing("center_lng"))?,
            ),
            spread_km: row.spread_km.unwrap_or(DEFAULT_HOTSPOT_SPREAD_KM),
        },
        "sector" => ZoneShape::Sector {
            sectors: split_list(row.sectors.as_deref().ok_or_else(|| missing("sectors"))?)
                .map(str::to_owned)
                .collect(),
        },
        "route" => ZoneShape::Route {
            points:    parse_route(row.route.as_deref().ok_or_else(|| missing("route"))?)?,
            spread_km: row.spread_km.unwrap_or(DEFAULT_ROUTE_SPREAD_KM),
        },
        other => return Err(DemandError::UnknownZoneType(other.to_owned())),
    };

    Ok(Zone::new(shape)
        .with_rate(row.min_orders.unwrap_or(0.0), row.max_orders.unwrap_or(0.0))
        .with_window(row.start_time.unwrap_or(0), row.end_time))
}

fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(';').map(str::trim).filter(|part| !part.is_empty())
}

fn parse_route(s: &str) -> DemandResult<Vec<GeoPoint>> {
    split_list(s)
        .map(|pair| {
            let (lat, lng) = pair
                .split_once(':')
                .ok_or_else(|| DemandError::Parse(format!("invalid route point {pair:?}: expected lat:lng")))?;
            let parse = |v: &str| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| DemandError::Parse(format!("invalid coordinate {v:?} in route point {pair:?}")))
            };
            Ok(GeoPoint::new(parse(lat)?, parse(lng)?))
        })
        .collect()
}
