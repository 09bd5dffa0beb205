//! ARIMA analysis entry points
//!
//! These wrap the full pipeline for a caller holding either raw
//! observations or an evenly spaced series, and return plain data ready to
//! serialize.

use crate::config::ArimaConfig;
use crate::data::{daily_series, DailySeries, Observation, SeriesInput};
use crate::error::Result;
use crate::models::arima::ArimaModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Serialize;
use series_math::ResidualMetrics;

/// Estimated coefficients alongside the requested orders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArimaParameters {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

/// Result of an ARIMA analysis, on the original scale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArimaAnalysis {
    pub parameters: ArimaParameters,
    pub fitted_values: Vec<f64>,
    pub residuals: Vec<f64>,
    pub forecast: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_dates: Option<Vec<NaiveDate>>,
    pub metrics: ResidualMetrics,
    /// Too few points to estimate coefficients; they are all zero
    pub insufficient_data: bool,
    pub log1p: bool,
}

impl ArimaAnalysis {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Bucket observations into days, then run [`analyze_series`] on the result
pub fn analyze(observations: &[Observation], config: &ArimaConfig) -> Result<ArimaAnalysis> {
    analyze_daily(&daily_series(observations), config)
}

/// Fit and forecast an evenly spaced series
pub fn analyze_series(values: &[f64], config: &ArimaConfig) -> Result<ArimaAnalysis> {
    analyze_daily(&DailySeries::from_values(values), config)
}

/// Dispatch on the shape of the input
pub fn analyze_input(input: SeriesInput, config: &ArimaConfig) -> Result<ArimaAnalysis> {
    analyze_daily(&input.into_daily_series(), config)
}

fn analyze_daily(series: &DailySeries, config: &ArimaConfig) -> Result<ArimaAnalysis> {
    config.validate()?;

    let model = ArimaModel::from_config(config);
    let trained = model.train(series.values())?;
    let insufficient_data = trained.is_insufficient();
    if insufficient_data {
        warn!(
            "{} on {} points leaves too little data to estimate; using zero coefficients",
            model.name(),
            series.len()
        );
    }

    let forecast = trained.forecast(config.horizon)?.into_values();
    let metrics = trained.metrics();
    info!(
        "{} fitted on {} points: rmse {:.4}, aic {:.4}",
        trained.name(),
        series.len(),
        metrics.rmse,
        metrics.aic
    );

    let coefficients = trained.coefficients().clone();
    Ok(ArimaAnalysis {
        parameters: ArimaParameters {
            ar: coefficients.ar,
            ma: coefficients.ma,
            p: config.order.p,
            d: config.order.d,
            q: config.order.q,
        },
        fitted_values: trained.fitted_values().to_vec(),
        residuals: trained.residuals().to_vec(),
        forecast,
        forecast_dates: series.forecast_dates(config.horizon),
        metrics,
        insufficient_data,
        log1p: config.log1p,
    })
}
