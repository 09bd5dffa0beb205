//! Model configuration
//!
//! Every grid the models search over lives here rather than in constants,
//! so a caller can narrow or widen a search without touching model code.
//! All structs deserialize from JSON with any field omitted falling back
//! to its default.

use crate::error::{ForecastError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn from_json_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// ARIMA orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Candidate MA(1) coefficients tried during estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThetaGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for ThetaGrid {
    fn default() -> Self {
        Self {
            start: -0.99,
            end: 0.99,
            step: 0.01,
        }
    }
}

impl ThetaGrid {
    /// Check that the grid is finite and non-empty
    pub fn validate(&self) -> Result<()> {
        if !self.start.is_finite() || !self.end.is_finite() || !self.step.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "Theta grid bounds and step must be finite".to_string(),
            ));
        }
        if self.step <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Theta grid step must be positive, got {}",
                self.step
            )));
        }
        if self.start > self.end {
            return Err(ForecastError::InvalidParameter(format!(
                "Theta grid start ({}) is after its end ({})",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Grid values in ascending order, end inclusive.
    ///
    /// Each value is computed from its index so rounding error does not
    /// accumulate across steps.
    pub fn values(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        let count = ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1;
        (0..count)
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }
}

/// Settings for an ARIMA analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaConfig {
    pub order: ArimaOrder,
    /// Number of steps to forecast
    pub horizon: usize,
    /// Model `log1p` of the series instead of the raw values
    pub log1p: bool,
    pub theta_grid: ThetaGrid,
    /// Seed the forecast MA history with in-sample residuals instead of an
    /// empty history
    pub seed_ma_with_residuals: bool,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            horizon: 14,
            log1p: false,
            theta_grid: ThetaGrid::default(),
            seed_ma_with_residuals: false,
        }
    }
}

impl ArimaConfig {
    /// Config with the given orders and horizon, everything else default
    pub fn new(p: usize, d: usize, q: usize, horizon: usize) -> Self {
        Self {
            order: ArimaOrder::new(p, d, q),
            horizon,
            ..Self::default()
        }
    }

    pub fn with_log1p(mut self, enabled: bool) -> Self {
        self.log1p = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.theta_grid.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = from_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Settings for the Holt grid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltGridConfig {
    /// Level smoothing candidates, searched in this order
    pub alphas: Vec<f64>,
    /// Trend smoothing candidates, searched in this order for each alpha
    pub betas: Vec<f64>,
    /// Derive a hold-out from the horizon when the caller gives none
    pub infer_holdout: bool,
    /// Coverage of the forecast intervals
    pub confidence_level: f64,
}

impl Default for HoltGridConfig {
    fn default() -> Self {
        Self {
            alphas: vec![0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9],
            betas: vec![0.05, 0.1, 0.15, 0.2, 0.3, 0.4],
            infer_holdout: false,
            confidence_level: 0.95,
        }
    }
}

impl HoltGridConfig {
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.alphas.is_empty() || self.betas.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "Alpha and beta grids must not be empty".to_string(),
            ));
        }
        if let Some(alpha) = self
            .alphas
            .iter()
            .find(|a| !a.is_finite() || **a <= 0.0 || **a > 1.0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Alpha must be in (0, 1], got {}",
                alpha
            )));
        }
        if let Some(beta) = self
            .betas
            .iter()
            .find(|b| !b.is_finite() || **b < 0.0 || **b > 1.0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "Beta must be in [0, 1], got {}",
                beta
            )));
        }
        series_math::metrics::z_score(self.confidence_level)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = from_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
