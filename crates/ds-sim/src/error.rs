use ds_core::GeoPoint;
use thiserror::Error;

/// Rejected parameter edit.  The previous value is always left in place.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown parameter `{0}`")]
    UnknownKey(String),

    #[error("`{key}` = {value} is outside {range}")]
    OutOfRange {
        key:   &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("`{key}` expects {expected}")]
    WrongType {
        key:      &'static str,
        expected: &'static str,
    },

    #[error("unknown demand profile `{0}`")]
    UnknownProfile(String),
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid simulation parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("order location {0} is not a valid coordinate")]
    InvalidLocation(GeoPoint),
}

pub type SimResult<T> = Result<T, SimError>;
