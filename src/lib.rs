//! # Forecast Workspace
//!
//! Single entry point re-exporting the workspace crates: `series_math` for
//! the numeric building blocks and `forecast_engine` for preprocessing,
//! models and tuning.
//!
//! ## Example
//!
//! ```
//! use forecast_workspace::engine::{analyze, ArimaConfig, Observation};
//!
//! let day = 86_400_000;
//! let observations: Vec<Observation> = (0..10)
//!     .map(|i| Observation::new(i * day, 100.0 + i as f64))
//!     .collect();
//!
//! let result = analyze(&observations, &ArimaConfig::new(1, 1, 0, 3)).unwrap();
//! assert_eq!(result.forecast.len(), 3);
//! assert_eq!(result.forecast_dates.unwrap().len(), 3);
//! ```

pub use forecast_engine as engine;
pub use series_math as math;

pub use forecast_engine::{analyze, analyze_series, best_holt_forecast, ForecastError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_reach_both_crates() {
        let diff = math::difference(&[1.0, 3.0, 6.0], 1);
        assert_eq!(diff, vec![2.0, 3.0]);

        let config = engine::HoltGridConfig::default();
        let result = best_holt_forecast(&[1.0, 2.0, 3.0], 2, None, &config).unwrap();
        assert_eq!(result.point_forecasts.len(), 2);
    }
}
