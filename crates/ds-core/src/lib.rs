//! `ds-core` — foundational types for the dark-store delivery simulator.
//!
//! Every other `ds-*` crate depends on this one.  It has no `ds-*`
//! dependencies and only `rand` and `thiserror` externally, plus optional
//! `serde`.
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `OrderId`                                       |
//! | [`geo`]    | `GeoPoint`, `Polygon`, `BoundingBox`, sampling, waypoints  |
//! | [`time`]   | `Tick` (one simulated minute), `SimClock`                  |
//! | [`rng`]    | `SimRng`                                                   |
//! | [`error`]  | `CoreError`, `CoreResult`, `SamplingExhausted`             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, points and ticks.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult, SamplingExhausted};
pub use geo::{BoundingBox, GeoPoint, Polygon};
pub use ids::{AgentId, OrderId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
