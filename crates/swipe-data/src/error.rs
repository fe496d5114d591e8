//! Error types for the swipe-data crate.

use thiserror::Error;

/// Errors produced while validating documents or constructing domain values.
///
/// Malformed documents are rejected here, at the decode boundary, instead of
/// letting missing fields travel further into the pipeline as nulls.
#[derive(Error, Debug)]
pub enum SwipeDataError {
    /// A required document field was absent or had the wrong JSON type
    #[error("Missing or invalid field: {field}")]
    MissingField { field: String },

    /// A field was present but carried a value outside its domain
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A swipe vote was neither +1 nor -1
    #[error("Invalid vote value: {0} (expected +1 or -1)")]
    InvalidVote(i64),

    /// A price tier outside the supported 1..=4 range
    #[error("Invalid price tier: {0} (expected 1..=4)")]
    InvalidPriceTier(u64),

    /// Search radius must be strictly positive
    #[error("Invalid search radius: {0} km (must be > 0)")]
    InvalidRadius(f64),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SwipeDataError>;
