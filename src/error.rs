//! Error types for the scroll observer.

use thiserror::Error;

/// Main error type for observer configuration.
///
/// Fluent setters never surface these: invalid condition input is dropped
/// silently per the degradation policy. The fallible constructors on
/// [`crate::Condition`] and [`crate::ScrollDirection`] return them for
/// callers that want the validation result.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Unknown scroll direction: {0:?} (expected \"up\" or \"down\")")]
    UnknownDirection(String),

    #[error("Offset threshold must be positive: {0}")]
    NonPositiveThreshold(f64),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
