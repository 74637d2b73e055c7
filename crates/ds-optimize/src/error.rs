use ds_sim::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizeError {
    #[error("fleet-size range {min}..={max} is empty")]
    EmptyFleetRange { min: usize, max: usize },

    #[error("repetitions per fleet size must be at least 1")]
    ZeroRepetitions,

    #[error("maximum run duration must be at least 1 minute")]
    ZeroDuration,

    #[error("delivery-time target must be a positive number of minutes, got {0}")]
    InvalidSlaTarget(f64),

    #[error("invalid batch demand: {0}")]
    InvalidDemand(String),

    #[error("invalid base parameters: {0}")]
    Parameters(#[from] ConfigError),
}

pub type OptimizeResult<T> = Result<T, OptimizeError>;
