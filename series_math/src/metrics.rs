//! Residual metrics for scoring fitted models
//!
//! Error measures take residuals (`actual - fitted`) directly so they can
//! be computed on any scale the caller chooses. Averages use `max(n, 1)`
//! as denominator, so an empty residual series scores zero instead of NaN.

use crate::{MathError, Result, VARIANCE_FLOOR};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

fn safe_len(values: &[f64]) -> f64 {
    values.len().max(1) as f64
}

fn check_lengths(actual: &[f64], other: &[f64], what: &str) -> Result<()> {
    if actual.len() != other.len() {
        return Err(MathError::InvalidInput(format!(
            "Actual length ({}) doesn't match {} length ({})",
            actual.len(),
            what,
            other.len()
        )));
    }
    Ok(())
}

/// Mean of the absolute residuals
pub fn mean_absolute_error(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r.abs()).sum::<f64>() / safe_len(residuals)
}

/// Mean of the squared residuals
pub fn mean_squared_error(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum::<f64>() / safe_len(residuals)
}

/// Square root of the mean squared residual
pub fn root_mean_squared_error(residuals: &[f64]) -> f64 {
    mean_squared_error(residuals).sqrt()
}

/// Gaussian log-likelihood of i.i.d. residuals.
///
/// The variance is the mean squared residual floored at [`VARIANCE_FLOOR`],
/// so a perfect fit stays finite.
pub fn log_likelihood(residuals: &[f64]) -> f64 {
    let n = safe_len(residuals);
    let variance = mean_squared_error(residuals).max(VARIANCE_FLOOR);
    -0.5 * n * (2.0 * PI * variance).ln() - 0.5 * n
}

/// Akaike information criterion for `k` estimated parameters
pub fn aic(residuals: &[f64], k: usize) -> f64 {
    -2.0 * log_likelihood(residuals) + 2.0 * k as f64
}

/// Bayesian information criterion for `k` estimated parameters
pub fn bic(residuals: &[f64], k: usize) -> f64 {
    -2.0 * log_likelihood(residuals) + k as f64 * safe_len(residuals).ln()
}

/// Mean absolute percentage error, in percent.
///
/// Points where the actual value is zero are left out of the average.
pub fn mean_absolute_percentage_error(actual: &[f64], residuals: &[f64]) -> Result<f64> {
    check_lengths(actual, residuals, "residuals")?;

    let terms: Vec<f64> = actual
        .iter()
        .zip(residuals)
        .filter(|(&a, _)| a != 0.0)
        .map(|(&a, &r)| (r / a).abs())
        .collect();

    if terms.is_empty() {
        return Ok(0.0);
    }
    Ok(terms.iter().sum::<f64>() / terms.len() as f64 * 100.0)
}

/// Symmetric mean absolute percentage error, in percent
pub fn symmetric_mean_absolute_percentage_error(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    check_lengths(actual, fitted, "fitted")?;

    let sum: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(&a, &f)| {
            let denom = a.abs() + f.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - f).abs() / denom
            }
        })
        .sum();

    Ok(sum / safe_len(actual) * 100.0)
}

/// Sample standard deviation of the residuals, zero below two points
pub fn residual_std_dev(residuals: &[f64]) -> f64 {
    if residuals.len() < 2 {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;
    let variance = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Two-sided standard normal critical value for a confidence level.
///
/// The customary rounded values are used for 90%, 95% and 99%; any other
/// level in `(0, 1)` uses the exact normal quantile.
pub fn z_score(confidence_level: f64) -> Result<f64> {
    if !confidence_level.is_finite() || confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(MathError::InvalidInput(format!(
            "Confidence level must be between 0 and 1, got {}",
            confidence_level
        )));
    }

    const TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.58)];
    if let Some(&(_, z)) = TABLE
        .iter()
        .find(|(level, _)| (level - confidence_level).abs() < 1e-9)
    {
        return Ok(z);
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Residual summary used for ARIMA model selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
}

impl ResidualMetrics {
    /// Compute all residual metrics for a model with `k` parameters
    pub fn from_residuals(residuals: &[f64], k: usize) -> Self {
        Self {
            mae: mean_absolute_error(residuals),
            rmse: root_mean_squared_error(residuals),
            aic: aic(residuals, k),
            bic: bic(residuals, k),
        }
    }
}

impl std::fmt::Display for ResidualMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Residual Metrics:")?;
        writeln!(f, "  MAE:  {:.4}", self.mae)?;
        writeln!(f, "  RMSE: {:.4}", self.rmse)?;
        writeln!(f, "  AIC:  {:.4}", self.aic)?;
        writeln!(f, "  BIC:  {:.4}", self.bic)?;
        Ok(())
    }
}

/// Forecast accuracy metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    #[serde(rename = "MAE")]
    pub mae: f64,
    /// Root Mean Squared Error
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    /// Mean Absolute Percentage Error
    #[serde(rename = "MAPE")]
    pub mape: f64,
    /// Symmetric Mean Absolute Percentage Error
    #[serde(rename = "sMAPE")]
    pub smape: f64,
}

impl AccuracyMetrics {
    /// Score fitted values against the actual values they predict
    pub fn from_fit(actual: &[f64], fitted: &[f64]) -> Result<Self> {
        check_lengths(actual, fitted, "fitted")?;
        let residuals: Vec<f64> = actual.iter().zip(fitted).map(|(a, f)| a - f).collect();

        Ok(Self {
            mae: mean_absolute_error(&residuals),
            rmse: root_mean_squared_error(&residuals),
            mape: mean_absolute_percentage_error(actual, &residuals)?,
            smape: symmetric_mean_absolute_percentage_error(actual, fitted)?,
        })
    }
}

impl std::fmt::Display for AccuracyMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy Metrics:")?;
        writeln!(f, "  MAE:   {:.4}", self.mae)?;
        writeln!(f, "  RMSE:  {:.4}", self.rmse)?;
        writeln!(f, "  MAPE:  {:.4}%", self.mape)?;
        writeln!(f, "  SMAPE: {:.4}%", self.smape)?;
        Ok(())
    }
}
