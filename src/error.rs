//! Error types surfaced at the crate's data boundary.

use thiserror::Error;

/// Failures while loading, validating or writing poster data.
#[derive(Debug, Error)]
pub enum PosterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid series JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A `date` field that is not `YYYY-MM`.
    #[error("invalid month '{value}', expected YYYY-MM")]
    BadMonth { value: String },

    #[error("series is empty")]
    EmptySeries,

    #[error("month {month} appears out of chronological order")]
    OutOfOrder { month: String },

    #[error("value for '{entity}' at {month} must be finite and non-negative, got {value}")]
    BadValue {
        entity: String,
        month: String,
        value: f64,
    },
}

pub type PosterResult<T> = Result<T, PosterError>;
