use assert_approx_eq::assert_approx_eq;
use forecast_engine::config::ThetaGrid;
use forecast_engine::models::arima::{
    estimate, estimated_parameters, fit, forecast, forecast_seeded, ArimaModel,
};
use forecast_engine::models::holt::HoltModel;
use forecast_engine::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use forecast_engine::ForecastError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rstest::rstest;
use series_math::metrics::aic;
use series_math::{difference, ResidualMetrics, Transform};

fn ar1_process(phi: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut series = Vec::with_capacity(n);
    let mut x = 0.0;
    for _ in 0..n {
        x = phi * x + noise.sample(&mut rng);
        series.push(x);
    }
    series
}

#[test]
fn test_fit_is_causal_and_aligned() {
    let series = [1.0, 2.0, 3.0];
    let result = fit(&series, &[], &[0.5]);

    // first step has no residual yet, second uses the first residual
    assert_eq!(result.fitted, vec![0.0, 1.0]);
    assert_eq!(result.residuals, vec![2.0, 2.0]);
}

#[test]
fn test_fit_ar_terms() {
    let series = [1.0, 2.0, 4.0, 8.0];
    let result = fit(&series, &[0.5, 0.25], &[]);

    assert_eq!(result.fitted.len(), 2);
    assert_eq!(result.fitted.len(), result.residuals.len());
    assert_approx_eq!(result.fitted[0], 0.5 * 2.0 + 0.25 * 1.0);
    assert_approx_eq!(result.fitted[1], 0.5 * 4.0 + 0.25 * 2.0);
    assert_approx_eq!(result.residuals[1], 8.0 - 2.5);
}

#[test]
fn test_fit_on_short_series_is_empty() {
    let result = fit(&[1.0], &[0.5, 0.5], &[0.1]);
    assert!(result.fitted.is_empty());
    assert!(result.residuals.is_empty());
}

#[test]
fn test_forecast_extends_with_own_predictions() {
    let values = forecast(&[2.0], &[0.5], &[], 3);
    assert_eq!(values, vec![1.0, 0.5, 0.25]);
}

#[test]
fn test_forecast_future_residuals_are_zero() {
    // with an empty residual history, a pure MA model forecasts zero
    assert_eq!(forecast(&[3.0, 1.0, 2.0], &[], &[0.8], 3), vec![0.0; 3]);

    // a seeded history contributes only until it is pushed out
    let seeded = forecast_seeded(&[3.0, 1.0, 2.0], &[0.5, -1.0], &[], &[0.8], 3);
    assert_approx_eq!(seeded[0], -0.8);
    assert_eq!(&seeded[1..], &[0.0, 0.0]);
}

#[rstest]
#[case(vec![], vec![], 1)]
#[case(vec![0.5], vec![], 5)]
#[case(vec![], vec![0.3, 0.1], 7)]
#[case(vec![0.4, 0.2, 0.1, 0.0, 0.0], vec![0.3, 0.0, 0.0, 0.0, 0.0], 60)]
fn test_forecast_horizon_invariant(#[case] ar: Vec<f64>, #[case] ma: Vec<f64>, #[case] horizon: usize) {
    for series in [vec![], vec![1.0], vec![1.0, 2.0, 3.0, 5.0, 8.0]] {
        assert_eq!(forecast(&series, &ar, &ma, horizon).len(), horizon);
    }
}

#[test]
fn test_estimate_constant_difference() {
    let series: Vec<f64> = (1..=10).map(|x| x as f64).collect();
    let coefficients = estimate(&series, 1, 0, 1, &ThetaGrid::default());

    assert_eq!(coefficients.ar.len(), 1);
    assert!(coefficients.ar[0].abs() < 1e-6);
    assert!(coefficients.ma.is_empty());
}

#[test]
fn test_estimate_insufficient_data_is_zero() {
    let coefficients = estimate(&[1.0, 5.0, 2.0], 2, 1, 1, &ThetaGrid::default());
    assert_eq!(coefficients.ar, vec![0.0, 0.0]);
    assert_eq!(coefficients.ma, vec![0.0]);

    let coefficients = estimate(&[], 1, 1, 0, &ThetaGrid::default());
    assert_eq!(coefficients.ar, vec![0.0]);
    assert_eq!(coefficients.ma, vec![0.0]);
}

#[test]
fn test_estimate_pads_higher_orders() {
    let series = ar1_process(0.5, 120, 7);
    let coefficients = estimate(&series, 3, 2, 0, &ThetaGrid::default());

    assert_eq!(coefficients.ar.len(), 3);
    assert_eq!(coefficients.ma.len(), 2);
    assert_eq!(&coefficients.ar[1..], &[0.0, 0.0]);
    assert_eq!(coefficients.ma[1], 0.0);
}

#[test]
fn test_estimate_recovers_ar_coefficient() {
    let series = ar1_process(0.7, 800, 42);
    let coefficients = estimate(&series, 1, 0, 0, &ThetaGrid::default());

    assert!((coefficients.ar[0] - 0.7).abs() < 0.1, "ar = {:?}", coefficients.ar);
}

#[test]
fn test_estimated_theta_beats_every_grid_point() {
    let series = ar1_process(0.3, 200, 11);
    let grid = ThetaGrid::default();
    let coefficients = estimate(&series, 1, 1, 1, &grid);
    let theta = coefficients.ma[0];
    assert!((-0.99..=0.99).contains(&theta));

    let differenced = difference(&series, 1);
    let mean = differenced.iter().sum::<f64>() / differenced.len() as f64;
    let centred: Vec<f64> = differenced.iter().map(|x| x - mean).collect();

    let score = |t: f64| aic(&fit(&centred, &coefficients.ar, &[t]).residuals, 2);
    let best = score(theta);
    for candidate in grid.values() {
        assert!(best <= score(candidate) + 1e-9, "theta {} beats {}", candidate, theta);
    }
}

#[test]
fn test_estimated_theta_is_a_grid_value() {
    let grid = ThetaGrid::default();
    let values = grid.values();

    for seed in 0..60 {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let n = 10 + (seed as usize % 30);
        let series: Vec<f64> = (0..n).map(|_| noise.sample(&mut rng)).collect();

        let theta = estimate(&series, 1, 1, 0, &grid).ma[0];
        assert!(
            values.iter().any(|v| *v == theta),
            "seed {} gave off-grid theta {}",
            seed,
            theta
        );
    }
}

#[test]
fn test_estimated_theta_on_a_coarse_grid() {
    let grid = ThetaGrid { start: -0.5, end: 0.5, step: 0.5 };
    let series = ar1_process(0.2, 50, 16);
    let theta = estimate(&series, 0, 1, 0, &grid).ma[0];
    assert!([-0.5, 0.0, 0.5].contains(&theta), "theta = {}", theta);
}

#[test]
fn test_metrics_count_only_estimated_coefficients() {
    let series = ar1_process(0.5, 80, 3);
    let trained = ArimaModel::new(3, 1, 2).train(&series).unwrap();

    let expected = ResidualMetrics::from_residuals(trained.residuals(), 2);
    assert_eq!(trained.metrics(), expected);
    assert_eq!(estimated_parameters(3, 2), 2);
    assert_eq!(estimated_parameters(0, 1), 1);
    assert_eq!(estimated_parameters(0, 0), 0);
}

#[test]
fn test_arima_model_trains_and_forecasts() {
    let series: Vec<f64> = (0..40).map(|i| 50.0 + 2.0 * i as f64 + (i % 3) as f64).collect();
    let model = ArimaModel::new(1, 1, 1);
    assert_eq!(model.name(), "ARIMA(1,1,1)");

    let trained = model.train(&series).unwrap();
    assert_eq!(trained.fitted_values().len(), trained.residuals().len());
    assert_eq!(trained.fitted_values().len(), series.len() - trained.fit_offset());

    let result = trained.forecast(5).unwrap();
    assert_eq!(result.horizons(), 5);
    // drift keeps the upward slope
    assert!(result.values()[4] > series[series.len() - 1]);
}

#[test]
fn test_arima_log1p_forecasts_stay_non_negative() {
    let series = vec![0.0, 3.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0];
    let model = ArimaModel::new(1, 1, 0).with_transform(Transform::Log1p);

    let trained = model.train(&series).unwrap();
    let values = trained.forecast_values(10).unwrap();
    assert_eq!(values.len(), 10);
    assert!(values.iter().all(|v| *v >= 0.0));
    assert!(trained.fitted_values().iter().all(|v| *v >= 0.0));
}

#[test]
fn test_holt_recursion() {
    let trained = HoltModel::new(0.5, 0.5).unwrap().train(&[10.0, 12.0, 13.0]).unwrap();

    // the first two points seed level=12, trend=2
    assert_eq!(trained.fitted_values(), &[14.0]);
    assert_eq!(trained.residuals(), &[-1.0]);
    assert_approx_eq!(trained.level(), 13.5);
    assert_approx_eq!(trained.trend(), 1.75);
    assert_approx_eq!(trained.point_forecasts(2)[1], 13.5 + 2.0 * 1.75);
}

#[test]
fn test_holt_linear_series() {
    let series = [10.0, 12.0, 14.0, 16.0, 18.0, 20.0];
    let trained = HoltModel::new(0.3, 0.1).unwrap().train(&series).unwrap();

    assert_approx_eq!(trained.level(), 20.0);
    assert_approx_eq!(trained.trend(), 2.0);

    let forecast = trained.forecast(3).unwrap();
    assert_approx_eq!(forecast.values()[0], 22.0);
    assert_approx_eq!(forecast.values()[1], 24.0);
    assert_approx_eq!(forecast.values()[2], 26.0);
}

#[test]
fn test_holt_metrics_skip_the_seed_step() {
    let trained = HoltModel::new(0.5, 0.3).unwrap().train(&[1.0, 2.0, 10.0]).unwrap();

    assert_eq!(trained.fitted_values(), &[3.0]);
    assert_eq!(trained.residuals(), &[7.0]);
    assert_approx_eq!(trained.accuracy().unwrap().rmse, 7.0);

    // two points only seed the state
    let seeded = HoltModel::new(0.5, 0.3).unwrap().train(&[1.0, 2.0]).unwrap();
    assert!(seeded.fitted_values().is_empty());
    assert_approx_eq!(seeded.point_forecasts(1)[0], 3.0);
}

#[test]
fn test_holt_accuracy_and_intervals() {
    let trained = HoltModel::new(0.5, 0.5)
        .unwrap()
        .train(&[10.0, 12.0, 13.0, 15.0])
        .unwrap();
    assert_eq!(trained.fitted_values(), &[14.0, 15.25]);
    assert_eq!(trained.residuals(), &[-1.0, -0.25]);

    let accuracy = trained.accuracy().unwrap();
    assert_approx_eq!(accuracy.mae, 0.625);
    assert_approx_eq!(accuracy.rmse, 0.53125_f64.sqrt());
    assert_approx_eq!(accuracy.mape, (1.0 / 13.0 + 0.25 / 15.0) / 2.0 * 100.0);
    assert_approx_eq!(accuracy.smape, (1.0 / 27.0 + 0.25 / 30.25) * 100.0);

    let sigma = trained.residual_std_dev();
    assert_approx_eq!(sigma, 0.28125_f64.sqrt());

    let intervals = trained.intervals(2, 0.95).unwrap();
    assert_eq!(intervals.len(), 2);
    for interval in &intervals {
        assert_approx_eq!(interval.upper - interval.point, 1.96 * sigma);
        assert_approx_eq!(interval.point - interval.lower, 1.96 * sigma);
    }
    assert!(trained.intervals(2, 1.5).is_err());
}

#[test]
fn test_holt_insufficient_data() {
    let model = HoltModel::new(0.5, 0.5).unwrap();
    assert!(matches!(model.train(&[1.0]), Err(ForecastError::InsufficientData(_))));
    assert!(matches!(model.train(&[]), Err(ForecastError::InsufficientData(_))));
}

#[test]
fn test_model_parameter_validation() {
    assert!(HoltModel::new(0.0, 0.5).is_err());
    assert!(HoltModel::new(1.5, 0.5).is_err());
    assert!(HoltModel::new(0.5, -0.1).is_err());
    assert!(HoltModel::new(f64::NAN, 0.5).is_err());
    assert!(HoltModel::new(1.0, 0.0).is_ok());
}

#[test]
fn test_forecast_result_operations() {
    let values = vec![105.0, 106.0, 107.0];
    let forecast = ForecastResult::new(values.clone(), 3).unwrap();

    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values(), &values[..]);
    assert!(forecast.intervals().is_none());

    let actual = vec![106.0, 107.0, 108.0];
    assert_approx_eq!(forecast.root_mean_squared_error(&actual).unwrap(), 1.0);
    assert!(forecast.root_mean_squared_error(&[1.0]).is_err());
    assert!(forecast.clone().into_intervals().is_empty());

    let with_intervals = forecast.with_intervals(2.0, 1.96);
    let intervals = with_intervals.intervals().unwrap();
    assert_approx_eq!(intervals[0].lower, 105.0 - 3.92);
    assert_approx_eq!(intervals[2].upper, 107.0 + 3.92);

    assert!(ForecastResult::new(vec![1.0], 2).is_err());
}
