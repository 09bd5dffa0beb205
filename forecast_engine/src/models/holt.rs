//! Holt double exponential smoothing
//!
//! ```text
//! level_t = α·y_t + (1 - α)·(level_{t-1} + trend_{t-1})
//! trend_t = β·(level_t - level_{t-1}) + (1 - β)·trend_{t-1}
//! ŷ_{t+k} = level_t + k·trend_t
//! ```
//!
//! The first two points seed `level = y₁`, `trend = y₁ - y₀`; fitted values
//! and residuals start at the third point.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastInterval, ForecastModel, ForecastResult, TrainedForecastModel};
use series_math::metrics::{residual_std_dev, z_score};
use series_math::AccuracyMetrics;

/// Holt linear trend model
#[derive(Debug, Clone)]
pub struct HoltModel {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
}

/// Trained Holt model
#[derive(Debug, Clone)]
pub struct TrainedHolt {
    name: String,
    alpha: f64,
    beta: f64,
    /// Level after the last observation
    level: f64,
    /// Trend after the last observation
    trend: f64,
    /// Observations the fitted values predict
    actual: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl HoltModel {
    /// Create a new Holt model
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if !beta.is_finite() || !(0.0..=1.0).contains(&beta) {
            return Err(ForecastError::InvalidParameter(format!(
                "Beta must be in [0, 1], got {}",
                beta
            )));
        }

        Ok(Self {
            name: format!("Holt (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl ForecastModel for HoltModel {
    type Trained = TrainedHolt;

    fn train(&self, series: &[f64]) -> Result<TrainedHolt> {
        if series.len() < 2 {
            return Err(ForecastError::InsufficientData(format!(
                "Holt smoothing needs at least 2 points, got {}",
                series.len()
            )));
        }

        // the first two points only seed the state
        let mut level = series[1];
        let mut trend = series[1] - series[0];
        let mut fitted = Vec::with_capacity(series.len() - 2);
        let mut residuals = Vec::with_capacity(series.len() - 2);

        for &y in &series[2..] {
            let prediction = level + trend;
            fitted.push(prediction);
            residuals.push(y - prediction);

            let new_level = self.alpha * y + (1.0 - self.alpha) * (level + trend);
            trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
            level = new_level;
        }

        Ok(TrainedHolt {
            name: self.name.clone(),
            alpha: self.alpha,
            beta: self.beta,
            level,
            trend,
            actual: series[2..].to_vec(),
            fitted,
            residuals,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHolt {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Level after the last observation
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Trend after the last observation
    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Trend line extrapolated `horizon` steps from the final state
    pub fn point_forecasts(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|k| self.level + k as f64 * self.trend)
            .collect()
    }

    /// Accuracy of the one-step fitted values
    pub fn accuracy(&self) -> Result<AccuracyMetrics> {
        Ok(AccuracyMetrics::from_fit(&self.actual, &self.fitted)?)
    }

    /// Sample standard deviation of the training residuals
    pub fn residual_std_dev(&self) -> f64 {
        residual_std_dev(&self.residuals)
    }

    /// Point forecasts with `± z·σ` bounds for a confidence level
    pub fn intervals(&self, horizon: usize, confidence_level: f64) -> Result<Vec<ForecastInterval>> {
        let z = z_score(confidence_level)?;
        Ok(self
            .forecast(horizon)?
            .with_intervals(self.residual_std_dev(), z)
            .into_intervals())
    }
}

impl TrainedForecastModel for TrainedHolt {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        ForecastResult::new(self.point_forecasts(horizon), horizon)
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    fn name(&self) -> &str {
        &self.name
    }
}
