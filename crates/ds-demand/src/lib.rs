//! `ds-demand` — where and when orders appear.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`city`]     | `CityMap`, `Sector`, the Chandigarh data set               |
//! | [`zone`]     | `Zone`, `ZoneShape` (uniform / hotspot / sector / route)   |
//! | [`profile`]  | `DemandProfile`, `ProfileCatalog`, `ProfileId`             |
//! | [`sampler`]  | `OrderLocationSampler`, `OrderPattern`                     |
//! | [`loader`]   | JSON and CSV profile loaders                               |
//! | [`error`]    | `DemandError`, `DemandResult<T>`                           |
//!
//! Runtime sampling never errors: an unresolvable zone yields `None` and
//! the caller skips that order.  Only the loaders return `DemandError`.

pub mod city;
pub mod error;
pub mod loader;
pub mod profile;
pub mod sampler;
pub mod zone;


pub use city::{CityMap, Sector};
pub use error::{DemandError, DemandResult};
pub use loader::{load_profiles_csv, load_profiles_csv_reader, load_profiles_json, load_profiles_json_reader};
pub use profile::{DemandProfile, ProfileCatalog, ProfileId};
pub use sampler::{OrderLocationSampler, OrderPattern};
pub use zone::{Zone, ZoneShape};
