//! Forecasting models for daily series

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A point forecast with its interval bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastInterval {
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ForecastInterval {
    /// Symmetric interval of half-width `margin` around `point`
    pub fn around(point: f64, margin: f64) -> Self {
        Self {
            point,
            lower: point - margin,
            upper: point + margin,
        }
    }
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Confidence intervals (optional)
    intervals: Option<Vec<ForecastInterval>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
        })
    }

    /// Attach `point ± z·sigma` intervals to every forecast value
    pub fn with_intervals(mut self, sigma: f64, z: f64) -> Self {
        let margin = z * sigma;
        self.intervals = Some(
            self.values
                .iter()
                .map(|&v| ForecastInterval::around(v, margin))
                .collect(),
        );
        self
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the confidence intervals, if available
    pub fn intervals(&self) -> Option<&[ForecastInterval]> {
        self.intervals.as_deref()
    }

    /// Take the intervals, empty when none were attached
    pub fn into_intervals(self) -> Vec<ForecastInterval> {
        self.intervals.unwrap_or_default()
    }

    /// Calculate root mean squared error between forecast and actual values
    pub fn root_mean_squared_error(&self, actual: &[f64]) -> Result<f64> {
        if self.values.len() != actual.len() {
            return Err(ForecastError::ValidationError(format!(
                "Forecast length ({}) doesn't match actual length ({})",
                self.values.len(),
                actual.len()
            )));
        }
        let errors: Vec<f64> = actual.iter().zip(&self.values).map(|(a, f)| a - f).collect();
        Ok(series_math::metrics::root_mean_squared_error(&errors))
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// One-step-ahead fitted values over the training data
    fn fitted_values(&self) -> &[f64];

    /// Training residuals, aligned with `fitted_values`
    fn residuals(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a numeric series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on an evenly spaced series
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
pub mod holt;
