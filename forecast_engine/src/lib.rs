//! # Forecast Engine
//!
//! Forecasting for daily business series.
//!
//! ## Features
//!
//! - Preprocessing of irregular timestamped observations into one value per UTC day
//! - ARIMA-style models with differencing, an optional `log1p` transform and
//!   AIC-driven MA estimation
//! - Holt double exponential smoothing with grid-search tuning and hold-out validation
//! - Forecast intervals and error metrics (MAE, RMSE, MAPE, sMAPE, AIC, BIC)
//!
//! ## Quick Start
//!
//! ```rust
//! use forecast_engine::config::{ArimaConfig, HoltGridConfig};
//! use forecast_engine::{analyze_series, best_holt_forecast};
//!
//! let series: Vec<f64> = (1..=30).map(|x| x as f64).collect();
//!
//! let arima = analyze_series(&series, &ArimaConfig::new(1, 1, 0, 3)).unwrap();
//! assert_eq!(arima.forecast.len(), 3);
//!
//! let holt = best_holt_forecast(&series, 3, Some(5), &HoltGridConfig::default()).unwrap();
//! assert_eq!(holt.point_forecasts.len(), 3);
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod tuning;

// Re-export commonly used types
pub use crate::analysis::{analyze, analyze_input, analyze_series, ArimaAnalysis};
pub use crate::config::{ArimaConfig, ArimaOrder, HoltGridConfig, ThetaGrid};
pub use crate::data::{daily_series, DailySeries, Observation, ObservationLoader, SeriesInput};
pub use crate::error::ForecastError;
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::tuning::{best_holt_forecast, HoltGridResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
