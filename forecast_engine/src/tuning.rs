//! Grid-search tuning of Holt smoothing parameters
//!
//! Every `(alpha, beta)` pair of a [`HoltGridConfig`] is scored, either by
//! forecasting a withheld tail of the series or, without a hold-out, by
//! in-sample RMSE. The winner is refit on the whole series.

use crate::config::HoltGridConfig;
use crate::error::{ForecastError, Result};
use crate::models::holt::{HoltModel, TrainedHolt};
use crate::models::{ForecastInterval, ForecastModel, TrainedForecastModel};
use log::{debug, warn};
use serde::Serialize;
use series_math::metrics::{root_mean_squared_error, z_score};
use series_math::AccuracyMetrics;

/// Fewest points Holt smoothing can be fitted on
pub const MIN_HOLT_POINTS: usize = 2;

/// Score of one grid point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridScore {
    pub alpha: f64,
    pub beta: f64,
    /// RMSE on the hold-out, or in-sample without one
    pub score: f64,
}

/// Outcome of a Holt grid search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoltGridResult {
    pub alpha: f64,
    pub beta: f64,
    pub point_forecasts: Vec<f64>,
    pub intervals: Vec<ForecastInterval>,
    pub metrics: AccuracyMetrics,
    /// One-step fitted values of the full-series refit
    pub fitted_train: Vec<f64>,
    pub level: f64,
    pub trend: f64,
    pub train_length: usize,
    pub test_length: usize,
    pub holdout_size: usize,
    /// Score of the winning grid point
    pub score: f64,
    pub confidence_level: f64,
}

impl HoltGridResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Number of trailing points to withhold for validation.
///
/// An explicit request wins; otherwise, when `infer` is set, the hold-out
/// is `min(horizon, n / 4)`. A hold-out that would leave fewer than
/// [`MIN_HOLT_POINTS`] training points is dropped and scoring falls back
/// to in-sample fit.
pub fn resolve_holdout(n: usize, horizon: usize, requested: Option<usize>, infer: bool) -> usize {
    let candidate = match requested {
        Some(size) => size,
        None if infer => horizon.min(n / 4),
        None => 0,
    };
    if candidate == 0 {
        return 0;
    }
    if n < candidate + MIN_HOLT_POINTS {
        warn!(
            "Hold-out of {} leaves fewer than {} training points out of {}; scoring in-sample",
            candidate, MIN_HOLT_POINTS, n
        );
        return 0;
    }
    candidate
}

/// Score a single `(alpha, beta)` pair on a train/test split
pub fn score_candidate(train: &[f64], test: &[f64], alpha: f64, beta: f64) -> Result<f64> {
    let trained = HoltModel::new(alpha, beta)?.train(train)?;
    if test.is_empty() {
        return Ok(root_mean_squared_error(trained.residuals()));
    }

    trained.forecast(test.len())?.root_mean_squared_error(test)
}

/// Score every grid point in alpha-major order
pub fn evaluate_grid(train: &[f64], test: &[f64], config: &HoltGridConfig) -> Result<Vec<GridScore>> {
    let mut scores = Vec::with_capacity(config.alphas.len() * config.betas.len());
    for &alpha in &config.alphas {
        for &beta in &config.betas {
            scores.push(GridScore {
                alpha,
                beta,
                score: score_candidate(train, test, alpha, beta)?,
            });
        }
    }
    Ok(scores)
}

/// Lowest finite score; ties keep the earliest grid point
pub fn select_best(scores: &[GridScore]) -> Option<GridScore> {
    scores
        .iter()
        .filter(|s| s.score.is_finite())
        .fold(None, |best: Option<GridScore>, candidate| match best {
            Some(current) if current.score <= candidate.score => Some(current),
            _ => Some(*candidate),
        })
}

/// Tune Holt smoothing on `series` and forecast `horizon` steps.
///
/// Non-finite values are dropped first. Fewer than two remaining points is
/// an [`ForecastError::InsufficientData`] error.
pub fn best_holt_forecast(
    series: &[f64],
    horizon: usize,
    holdout: Option<usize>,
    config: &HoltGridConfig,
) -> Result<HoltGridResult> {
    config.validate()?;

    let usable: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    if usable.len() < MIN_HOLT_POINTS {
        return Err(ForecastError::InsufficientData(format!(
            "Holt grid search needs at least {} usable points, got {}",
            MIN_HOLT_POINTS,
            usable.len()
        )));
    }

    let holdout_size = resolve_holdout(usable.len(), horizon, holdout, config.infer_holdout);
    let (train, test) = usable.split_at(usable.len() - holdout_size);

    let scores = evaluate_grid(train, test, config)?;
    let best = select_best(&scores).ok_or_else(|| {
        ForecastError::ValidationError("No grid point produced a finite score".to_string())
    })?;
    debug!(
        "Holt grid search over {} points picked alpha={} beta={} (score {:.4})",
        scores.len(),
        best.alpha,
        best.beta,
        best.score
    );

    let model = HoltModel::new(best.alpha, best.beta)?;
    let train_fit = model.train(train)?;
    let full_fit: TrainedHolt = if holdout_size == 0 {
        train_fit.clone()
    } else {
        model.train(&usable)?
    };

    let z = z_score(config.confidence_level)?;
    let forecast = full_fit
        .forecast(horizon)?
        .with_intervals(train_fit.residual_std_dev(), z);
    let point_forecasts = forecast.values().to_vec();
    let intervals = forecast.into_intervals();

    Ok(HoltGridResult {
        alpha: best.alpha,
        beta: best.beta,
        point_forecasts,
        intervals,
        metrics: full_fit.accuracy()?,
        fitted_train: full_fit.fitted_values().to_vec(),
        level: full_fit.level(),
        trend: full_fit.trend(),
        train_length: train.len(),
        test_length: test.len(),
        holdout_size,
        score: best.score,
        confidence_level: config.confidence_level,
    })
}
