use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandError {
    #[error("demand profile parse error: {0}")]
    Parse(String),

    #[error("unknown zone type {0:?}: expected uniform, hotspot, sector, or route")]
    UnknownZoneType(String),

    #[error("zone in profile {profile:?} is missing {field}")]
    MissingField {
        profile: String,
        field:   &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DemandResult<T> = Result<T, DemandError>;
