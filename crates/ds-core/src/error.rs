//! Core error types.
//!
//! Sub-crates define their own error enums and wrap `CoreError` via `From`
//! where a core failure can surface through them.

use thiserror::Error;

/// Rejection sampling ran out of attempts before producing a point.
///
/// Never fatal: callers fall back to a default location or skip the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rejection sampling exhausted after {attempts} attempts")]
pub struct SamplingExhausted {
    pub attempts: usize,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("polygon needs at least 3 vertices, got {0}")]
    DegeneratePolygon(usize),

    #[error("coordinate out of range: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error(transparent)]
    Sampling(#[from] SamplingExhausted),
}

/// Shorthand result type for `ds-core`.
pub type CoreResult<T> = Result<T, CoreError>;
