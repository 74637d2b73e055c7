//! Fluent builder for constructing a [`Simulation`].

use ds_core::GeoPoint;
use ds_demand::{CityMap, DemandProfile, ProfileCatalog};

use crate::series::DEFAULT_SERIES_WINDOW;
use crate::{SimResult, Simulation, SimulationParameters};

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                          |
/// |----------------------|----------------------------------|
/// | `.params(p)`         | `SimulationParameters::default()`|
/// | `.city(c)`           | `CityMap::chandigarh()`          |
/// | `.catalog(c)`        | empty `ProfileCatalog`           |
/// | `.profile(p)`        | adds one profile to the catalog  |
/// | `.hub(p)`            | the city's default hub           |
/// | `.series_window(n)`  | 100                              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimulationBuilder::new()
///     .params(params)
///     .catalog(load_profiles_json(Path::new("profiles.json"))?)
///     .build()?;
/// sim.start();
/// while let Some(report) = sim.tick() { /* … */ }
/// ```
#[derive(Default)]
pub struct SimulationBuilder {
    params:  SimulationParameters,
    city:    Option<CityMap>,
    catalog: ProfileCatalog,
    hub:     Option<GeoPoint>,
    window:  Option<usize>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: SimulationParameters) -> Self {
        self.params = params;
        self
    }

    pub fn city(mut self, city: CityMap) -> Self {
        self.city = Some(city);
        self
    }

    pub fn catalog(mut self, catalog: ProfileCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn profile(mut self, profile: DemandProfile) -> Self {
        self.catalog.insert(profile);
        self
    }

    /// Run from a hub other than the city default.
    pub fn hub(mut self, hub: GeoPoint) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn series_window(mut self, window: usize) -> Self {
        self.window = Some(window);
        self
    }

    /// Validate the parameters and spawn the initial (idle) world.
    pub fn build(self) -> SimResult<Simulation> {
        self.params.validate()?;
        let city = self.city.unwrap_or_default();
        let hub = self.hub.unwrap_or(city.hub);
        Ok(Simulation::from_parts(
            self.params,
            city,
            self.catalog,
            hub,
            self.window.unwrap_or(DEFAULT_SERIES_WINDOW),
        ))
    }
}
