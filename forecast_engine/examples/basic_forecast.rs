use forecast_engine::config::{ArimaConfig, HoltGridConfig};
use forecast_engine::{analyze, best_holt_forecast, daily_series, Observation};

const DAY: i64 = 86_400_000;
// 2024-03-01T00:00:00Z
const START: i64 = 1_709_251_200_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Forecast Engine: Basic Forecasting Example");
    println!("==========================================\n");

    let observations = create_sample_orders();
    let series = daily_series(&observations);
    println!(
        "{} orders bucketed into {} days starting {:?}\n",
        observations.len(),
        series.len(),
        series.start_date()
    );

    // ARIMA on the daily totals
    let config = ArimaConfig::new(1, 1, 1, 7);
    let arima = analyze(&observations, &config)?;
    println!("{}", config.order);
    println!("  ar = {:?}, ma = {:?}", arima.parameters.ar, arima.parameters.ma);
    println!("  {}", arima.metrics);
    if let Some(dates) = &arima.forecast_dates {
        for (date, value) in dates.iter().zip(&arima.forecast) {
            println!("  {}  {:>10.2}", date, value);
        }
    }

    // Holt with a one-week hold-out
    let holt = best_holt_forecast(series.values(), 7, Some(7), &HoltGridConfig::default())?;
    println!(
        "\nHolt (alpha={:.2}, beta={:.2}), hold-out score {:.3}",
        holt.alpha, holt.beta, holt.score
    );
    println!("  {}", holt.metrics);
    for interval in &holt.intervals {
        println!(
            "  {:>10.2}  [{:>10.2}, {:>10.2}]",
            interval.point, interval.lower, interval.upper
        );
    }

    Ok(())
}

// Three orders a day with a weekly rhythm and a slow upward trend; the
// tenth day has no orders at all.
fn create_sample_orders() -> Vec<Observation> {
    let mut observations = Vec::new();
    for day in 0..42i64 {
        if day == 10 {
            continue;
        }
        let base = 120.0 + 1.5 * day as f64 + if day % 7 >= 5 { 25.0 } else { 0.0 };
        for (slot, share) in [0.3, 0.5, 0.2].iter().enumerate() {
            let timestamp = START + day * DAY + (slot as i64 + 1) * 4 * 3_600_000;
            observations.push(Observation::new(timestamp, base * share));
        }
    }
    observations
}
