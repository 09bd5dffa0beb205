//! # Series Math
//!
//! Numeric building blocks shared by the forecasting models.
//! This crate provides differencing, the log1p variance-stabilizing
//! transform and the residual metrics used to score fitted models.

use thiserror::Error;

pub mod differencing;
pub mod metrics;
pub mod transform;

pub use differencing::{
    anchors_at, difference, difference_anchors, undifference, undifference_n, undifference_point,
};
pub use metrics::{AccuracyMetrics, ResidualMetrics};
pub use transform::Transform;

/// Floor applied to variances before they are used as a denominator
pub const VARIANCE_FLOOR: f64 = 1e-9;

/// Errors that can occur in series calculations
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
