//! ARIMA models for daily series forecasting
//!
//! The model follows the classic transform → difference → ARMA → undo
//! pipeline with deliberately simple estimators:
//!
//! - AR(1) is the lag-1 autocorrelation of the differenced series
//! - MA(1) starts from the lag-2 autocorrelation and is refined by an AIC
//!   grid search over [`ThetaGrid`]
//! - orders above 1 are zero-padded rather than estimated
//!
//! The ARMA recursion runs on the differenced series centred on its
//! sample mean; the mean is added back as a drift term, so a series with
//! a constant first difference keeps its slope in the forecast.

use crate::config::{ArimaConfig, ArimaOrder, ThetaGrid};
use crate::error::Result;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use log::debug;
use serde::{Deserialize, Serialize};
use series_math::metrics::aic;
use series_math::{
    anchors_at, difference, undifference_n, undifference_point, ResidualMetrics, Transform,
    VARIANCE_FLOOR,
};

/// Fewest differenced points the estimator will work from
pub const MIN_ESTIMATION_POINTS: usize = 3;

/// Estimated AR and MA coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArimaCoefficients {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
}

impl ArimaCoefficients {
    pub fn zeros(p: usize, q: usize) -> Self {
        Self {
            ar: vec![0.0; p],
            ma: vec![0.0; q],
        }
    }
}

/// In-sample one-step-ahead fit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitResult {
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
}

fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

fn autocovariance(series: &[f64], lag: usize, mean: f64) -> f64 {
    if series.len() <= lag {
        return 0.0;
    }
    let sum: f64 = series[lag..]
        .iter()
        .zip(series)
        .map(|(x, lagged)| (x - mean) * (lagged - mean))
        .sum();
    sum / series.len() as f64
}

fn centre(series: &[f64], mean: f64) -> Vec<f64> {
    series.iter().map(|x| x - mean).collect()
}

/// One-step prediction from the histories seen so far.
///
/// Coefficient `j` multiplies the value `j + 1` steps back; terms with no
/// history yet contribute nothing.
fn predict_next(history: &[f64], shocks: &[f64], ar: &[f64], ma: &[f64]) -> f64 {
    let ar_part: f64 = ar.iter().zip(history.iter().rev()).map(|(c, y)| c * y).sum();
    let ma_part: f64 = ma.iter().zip(shocks.iter().rev()).map(|(c, e)| c * e).sum();
    ar_part + ma_part
}

/// Fit the ARMA recursion to a series.
///
/// Fitting starts at `max(len(ar), len(ma))` and the residual history only
/// ever holds residuals already computed, so every prediction is causal.
pub fn fit(series: &[f64], ar: &[f64], ma: &[f64]) -> FitResult {
    let start = ar.len().max(ma.len());
    let capacity = series.len().saturating_sub(start);
    let mut fitted = Vec::with_capacity(capacity);
    let mut residuals = Vec::with_capacity(capacity);

    for i in start..series.len() {
        let yhat = predict_next(&series[..i], &residuals, ar, ma);
        residuals.push(series[i] - yhat);
        fitted.push(yhat);
    }

    FitResult { fitted, residuals }
}

/// Forecast `horizon` steps past the end of a series.
///
/// Each forecast is appended to the working history. Future residuals are
/// unobservable, so the MA history starts empty and grows with zeros.
pub fn forecast(series: &[f64], ar: &[f64], ma: &[f64], horizon: usize) -> Vec<f64> {
    forecast_seeded(series, &[], ar, ma, horizon)
}

/// Forecast with the MA history seeded by in-sample residuals.
///
/// Future residuals are still taken as zero, so the MA contribution fades
/// out after `len(ma)` steps.
pub fn forecast_seeded(
    series: &[f64],
    residuals: &[f64],
    ar: &[f64],
    ma: &[f64],
    horizon: usize,
) -> Vec<f64> {
    let mut history = series.to_vec();
    let mut shocks = residuals.to_vec();
    let mut forecasts = Vec::with_capacity(horizon);

    for _ in 0..horizon {
        let yhat = predict_next(&history, &shocks, ar, ma);
        history.push(yhat);
        shocks.push(0.0);
        forecasts.push(yhat);
    }

    forecasts
}

/// Estimate AR and MA coefficients for `series`.
///
/// The series is differenced `d` times first. With fewer than
/// [`MIN_ESTIMATION_POINTS`] differenced values all coefficients are zero.
/// Only the first AR and first MA coefficient are estimated; the vectors
/// are zero-padded to length `p` and `q`.
pub fn estimate(series: &[f64], p: usize, q: usize, d: usize, grid: &ThetaGrid) -> ArimaCoefficients {
    let differenced = difference(series, d);
    if differenced.len() < MIN_ESTIMATION_POINTS {
        return ArimaCoefficients::zeros(p, q);
    }
    if p > 1 || q > 1 {
        debug!(
            "Only first-order AR/MA terms are estimated; padding ARIMA({},{},{}) with zeros",
            p, d, q
        );
    }

    let mu = mean(&differenced);
    let variance = autocovariance(&differenced, 0, mu).max(VARIANCE_FLOOR);

    let mut ar = Vec::with_capacity(p);
    if p >= 1 {
        ar.push(autocovariance(&differenced, 1, mu) / variance);
    }
    ar.resize(p, 0.0);

    let mut ma = Vec::with_capacity(q);
    if q >= 1 {
        let initial = initial_theta(&differenced, mu, variance);
        ma.push(refine_theta(&centre(&differenced, mu), &ar, initial, grid));
    }
    ma.resize(q, 0.0);

    ArimaCoefficients { ar, ma }
}

/// Coefficients actually estimated for orders `p` and `q`; padding
/// above order 1 is not counted
pub fn estimated_parameters(p: usize, q: usize) -> usize {
    p.min(1) + q.min(1)
}

fn initial_theta(series: &[f64], mean: f64, variance: f64) -> f64 {
    if series.len() < 3 {
        return -0.3;
    }
    (autocovariance(series, 2, mean) / variance).clamp(-0.9, 0.9)
}

/// Pick the grid value of the MA(1) coefficient with the lowest finite AIC.
///
/// Ties keep the earlier grid value. `initial` is returned only when no
/// grid value scores finitely.
fn refine_theta(series: &[f64], ar: &[f64], initial: f64, grid: &ThetaGrid) -> f64 {
    let k = ar.len() + 1;
    let score = |theta: f64| aic(&fit(series, ar, &[theta]).residuals, k);

    let mut best = initial;
    let mut best_score: Option<f64> = None;

    for theta in grid.values() {
        let candidate = score(theta);
        if !candidate.is_finite() {
            continue;
        }
        if best_score.map_or(true, |current| candidate < current) {
            best = theta;
            best_score = Some(candidate);
        }
    }

    debug!("MA(1) grid search picked theta={:.2} (initial {:.3})", best, initial);
    best
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    transform: Transform,
    theta_grid: ThetaGrid,
    seed_ma_with_residuals: bool,
}

impl ArimaModel {
    /// Create a new ARIMA model with default estimation settings
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self::from_config(&ArimaConfig::new(p, d, q, 1))
    }

    /// Create a model from an analysis config
    pub fn from_config(config: &ArimaConfig) -> Self {
        let transform = Transform::from_log1p(config.log1p);
        let name = match transform {
            Transform::Identity => config.order.to_string(),
            Transform::Log1p => format!("{} on log1p", config.order),
        };
        Self {
            name,
            order: config.order,
            transform,
            theta_grid: config.theta_grid,
            seed_ma_with_residuals: config.seed_ma_with_residuals,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArima {
    name: String,
    order: ArimaOrder,
    transform: Transform,
    seed_ma_with_residuals: bool,
    coefficients: ArimaCoefficients,
    /// Original-scale training series
    series: Vec<f64>,
    /// Training series after the forward transform
    transformed: Vec<f64>,
    /// Sample mean of the differenced series
    drift: f64,
    /// Differenced series centred on `drift`
    centred: Vec<f64>,
    /// Residuals of the centred fit
    centred_residuals: Vec<f64>,
    /// Index in `series` of the first fitted value
    fit_offset: usize,
    fitted_values: Vec<f64>,
    residuals: Vec<f64>,
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArima;

    fn train(&self, series: &[f64]) -> Result<TrainedArima> {
        let ArimaOrder { p, d, q } = self.order;

        let transformed = self.transform.forward_all(series);
        let coefficients = estimate(&transformed, p, q, d, &self.theta_grid);

        let differenced = difference(&transformed, d);
        let drift = mean(&differenced);
        let centred = centre(&differenced, drift);
        let fit = fit(&centred, &coefficients.ar, &coefficients.ma);

        // differenced index j sits at series index j + d
        let fit_offset = d + coefficients.ar.len().max(coefficients.ma.len());
        let mut fitted_values = Vec::with_capacity(fit.fitted.len());
        for (i, &step) in fit.fitted.iter().enumerate() {
            let anchors = anchors_at(&transformed, d, fit_offset + i)?;
            let level = undifference_point(step + drift, &anchors);
            fitted_values.push(self.transform.inverse(level));
        }

        let residuals = series[fit_offset.min(series.len())..]
            .iter()
            .zip(&fitted_values)
            .map(|(actual, fitted)| actual - fitted)
            .collect();

        Ok(TrainedArima {
            name: self.name.clone(),
            order: self.order,
            transform: self.transform,
            seed_ma_with_residuals: self.seed_ma_with_residuals,
            coefficients,
            series: series.to_vec(),
            transformed,
            drift,
            centred,
            centred_residuals: fit.residuals,
            fit_offset,
            fitted_values,
            residuals,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArima {
    pub fn coefficients(&self) -> &ArimaCoefficients {
        &self.coefficients
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Index of the training series the first fitted value belongs to
    pub fn fit_offset(&self) -> usize {
        self.fit_offset
    }

    /// Whether too few differenced points were left to estimate coefficients
    pub fn is_insufficient(&self) -> bool {
        self.centred.len() < MIN_ESTIMATION_POINTS
    }

    /// Residual metrics on the original scale, counting only the
    /// estimated coefficients
    pub fn metrics(&self) -> ResidualMetrics {
        let k = estimated_parameters(self.order.p, self.order.q);
        ResidualMetrics::from_residuals(&self.residuals, k)
    }

    /// Point forecasts on the original scale
    pub fn forecast_values(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.centred.is_empty() {
            // nothing left after differencing: carry the last observation
            let carry = self.series.last().copied().unwrap_or(0.0);
            return Ok(vec![carry; horizon]);
        }

        let ArimaCoefficients { ar, ma } = &self.coefficients;
        let steps = if self.seed_ma_with_residuals {
            forecast_seeded(&self.centred, &self.centred_residuals, ar, ma, horizon)
        } else {
            forecast(&self.centred, ar, ma, horizon)
        };
        let steps: Vec<f64> = steps.iter().map(|s| s + self.drift).collect();

        let anchors = anchors_at(&self.transformed, self.order.d, self.transformed.len())?;
        let levels = undifference_n(&steps, &anchors);
        Ok(self.transform.inverse_all(&levels))
    }
}

impl TrainedForecastModel for TrainedArima {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        ForecastResult::new(self.forecast_values(horizon)?, horizon)
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted_values
    }

    fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    fn name(&self) -> &str {
        &self.name
    }
}
