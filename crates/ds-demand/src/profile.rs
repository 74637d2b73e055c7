//! Demand profiles, the profile catalog, and profile selection ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use ds_core::Tick;

use crate::zone::Zone;
use crate::DemandError;

// ── DemandProfile ─────────────────────────────────────────────────────────────

/// A named, ordered list of zones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemandProfile {
    pub name:  String,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

impl DemandProfile {
    pub fn new(name: impl Into<String>, zones: Vec<Zone>) -> Self {
        Self { name: name.into(), zones }
    }

    /// Zones whose validity window contains `t`, in profile order.
    pub fn active_zones(&self, t: Tick) -> impl Iterator<Item = &Zone> + '_ {
        self.zones.iter().filter(move |z| z.is_active(t))
    }

    /// `true` when every zone stops at a finite time (and there is at least
    /// one zone), so the profile eventually produces no more demand.
    pub fn is_bounded(&self) -> bool {
        !self.zones.is_empty() && self.zones.iter().all(Zone::is_bounded)
    }

    /// Latest zone end time, if the profile is bounded.
    pub fn last_end_time(&self) -> Option<u64> {
        if !self.is_bounded() {
            return None;
        }
        self.zones.iter().filter_map(|z| z.end_time).max()
    }
}

// ── ProfileCatalog ────────────────────────────────────────────────────────────

/// The set of user-defined profiles available to a simulation.
#[derive(Clone, Debug, Default)]
pub struct ProfileCatalog {
    profiles: Vec<DemandProfile>,
}

impl ProfileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing any profile with the same name.
    pub fn insert(&mut self, profile: DemandProfile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DemandProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn into_profiles(self) -> Vec<DemandProfile> {
        self.profiles
    }
}

impl FromIterator<DemandProfile> for ProfileCatalog {
    fn from_iter<I: IntoIterator<Item = DemandProfile>>(iter: I) -> Self {
        let mut catalog = ProfileCatalog::new();
        for p in iter {
            catalog.insert(p);
        }
        catalog
    }
}

// ── ProfileId ─────────────────────────────────────────────────────────────────

/// Which demand pattern a run uses.
///
/// String form: `default_uniform`, `default_focused`, or `custom_<name>`.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProfileId {
    /// Disk around the hub with the configured uniform radius.
    #[default]
    DefaultUniform,
    /// Disk around the hub with the (smaller) focused radius.
    DefaultFocused,
    /// A named profile from the catalog.
    Custom(String),
}

const CUSTOM_PREFIX: &str = "custom_";

impl FromStr for ProfileId {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default_uniform" => Ok(ProfileId::DefaultUniform),
            "default_focused" => Ok(ProfileId::DefaultFocused),
            other => match other.strip_prefix(CUSTOM_PREFIX) {
                Some(name) if !name.is_empty() => Ok(ProfileId::Custom(name.to_owned())),
                _ => Err(DemandError::Parse(format!(
                    "invalid profile id {other:?}: expected default_uniform, default_focused, or custom_<name>"
                ))),
            },
        }
    }
}

impl TryFrom<String> for ProfileId {
    type Error = DemandError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProfileId> for String {
    fn from(id: ProfileId) -> String {
        id.to_string()
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileId::DefaultUniform => f.write_str("default_uniform"),
            ProfileId::DefaultFocused => f.write_str("default_focused"),
            ProfileId::Custom(name) => write!(f, "{CUSTOM_PREFIX}{name}"),
        }
    }
}
