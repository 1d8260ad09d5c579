//! Error types for the layout engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a layout plan
#[derive(Error, Debug)]
pub enum Error {
    /// The invoice snapshot failed validation
    #[error("Invalid document: {0}")]
    Validation(#[from] ValidationError),

    /// The layout configuration cannot produce a usable plan
    #[error("Invalid layout configuration: {0}")]
    Config(#[from] ConfigError),

    /// Config or snapshot JSON could not be parsed
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bad input data. Rejected before pagination, never coerced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("line item {index} has non-positive quantity {quantity}")]
    NonPositiveQuantity { index: usize, quantity: i64 },

    #[error("line item {index} has a non-finite {field}")]
    NonFinitePrice { index: usize, field: &'static str },

    #[error("line item {index} has an empty name")]
    EmptyName { index: usize },

    #[error("{block} block has a non-finite {field}")]
    NonFiniteAmount {
        block: &'static str,
        field: &'static str,
    },
}

/// Misconfigured constants. Fatal for the engine, not for a single document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    NonPositiveDimension { name: &'static str, value: f32 },

    #[error("compact scale must be in (0, 1], got {0}")]
    ScaleOutOfRange(f32),

    #[error("footer start offset {footer_start} is above first item offset {first_item}")]
    InvertedFirstPage { first_item: f32, footer_start: f32 },

    #[error("{role} page capacity is zero in {density} mode")]
    ZeroCapacity {
        role: &'static str,
        density: &'static str,
    },

    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },

    #[error("compact band {min}..={max} is empty")]
    EmptyCompactBand { min: usize, max: usize },
}
