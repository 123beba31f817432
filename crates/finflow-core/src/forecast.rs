//! Mock forecast generator
//!
//! Projects a random perturbation of a fixed base value and draws a noisy
//! straight line between the two. There is no statistical model here.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::error::{CoreError, CoreResult};
use crate::models::{ChartPoint, ForecastData};
use crate::types::Trend;

/// Metrics offered on the forecast page, with display labels
pub const METRICS: &[(&str, &str)] = &[
    ("revenue", "Revenue"),
    ("expenses", "Expenses"),
    ("profit", "Profit"),
    ("cashflow", "Cash Flow"),
];

/// Horizons offered on the forecast page, in days
pub const PERIODS: &[u32] = &[7, 30, 90];

/// Longest horizon accepted, in days
pub const MAX_PERIOD: u32 = finflow_config::MAX_FORECAST_PERIOD;

pub const REVENUE_BASE: f64 = 45_200.0;
pub const EXPENSES_BASE: f64 = 29_780.0;
pub const CASH_FLOW_BASE: f64 = 15_420.0;
pub const CONFIDENCE: u32 = 85;

/// Projected growth factor is drawn from `[MIN_GROWTH, MAX_GROWTH)`
const MIN_GROWTH: f64 = -0.1;
const MAX_GROWTH: f64 = 0.3;

/// Current value for a metric; unknown metrics use cash flow
pub fn base_value(metric: &str) -> f64 {
    match metric {
        "revenue" => REVENUE_BASE,
        "expenses" => EXPENSES_BASE,
        _ => CASH_FLOW_BASE,
    }
}

pub fn metric_label(metric: &str) -> &str {
    METRICS
        .iter()
        .find(|(key, _)| *key == metric)
        .map(|(_, label)| *label)
        .unwrap_or(metric)
}

/// Distance between chart points, in days
pub fn step_for(period: u32) -> u32 {
    (period / 10).max(1)
}

#[derive(Debug, Clone, Copy)]
pub struct ForecastGenerator {
    /// Half-width of the uniform noise added to each chart point
    pub noise: f64,
}

impl Default for ForecastGenerator {
    fn default() -> Self {
        Self { noise: 500.0 }
    }
}

impl ForecastGenerator {
    pub fn new(noise: f64) -> Self {
        let noise = if noise.is_finite() { noise.max(0.0) } else { 0.0 };
        Self { noise }
    }

    pub fn generate<R: Rng>(
        &self,
        metric: &str,
        period: u32,
        today: NaiveDate,
        rng: &mut R,
    ) -> CoreResult<ForecastData> {
        if period == 0 {
            return Err(CoreError::ValidationError {
                message: "Forecast period must be at least 1 day".to_string(),
            });
        }
        if period > MAX_PERIOD {
            return Err(CoreError::ValidationError {
                message: format!("Forecast period must be at most {} days", MAX_PERIOD),
            });
        }

        let base = base_value(metric);
        let projected = base * (1.0 + rng.gen_range(MIN_GROWTH..MAX_GROWTH));

        let step = step_for(period);
        let mut chart_data = Vec::with_capacity((period / step) as usize + 1);
        for i in (0..=period).step_by(step as usize) {
            let progress = f64::from(i) / f64::from(period);
            let jitter = if self.noise > 0.0 {
                rng.gen_range(-self.noise..self.noise)
            } else {
                0.0
            };
            let value = base + (projected - base) * progress + jitter;
            let date = today
                .checked_add_signed(Duration::days(i64::from(i)))
                .ok_or_else(|| CoreError::ValidationError {
                    message: "Forecast runs past the supported date range".to_string(),
                })?;
            chart_data.push(ChartPoint {
                date,
                value: value.round() as i64,
            });
        }

        let projected_value = projected.round();
        let trend = if projected_value > base {
            Trend::Up
        } else if projected_value < base {
            Trend::Down
        } else {
            Trend::Stable
        };

        Ok(ForecastData {
            metric: metric.to_string(),
            period,
            current_value: base,
            projected_value,
            trend,
            confidence: CONFIDENCE,
            insights: insights(metric, period),
            chart_data,
        })
    }
}

fn insights(metric: &str, period: u32) -> Vec<String> {
    vec![
        format!(
            "Based on your current {} trends, we expect continued growth over the next {} days",
            metric, period
        ),
        format!("Your {} has been consistently increasing over the past 3 months", metric),
        "Consider planning for increased cash flow needs in the coming period".to_string(),
        "This forecast assumes your current business patterns continue".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_base_values() {
        assert_eq!(base_value("revenue"), 45_200.0);
        assert_eq!(base_value("expenses"), 29_780.0);
        assert_eq!(base_value("profit"), 15_420.0);
        assert_eq!(base_value("cashflow"), 15_420.0);
        assert_eq!(metric_label("cashflow"), "Cash Flow");
        assert_eq!(metric_label("burn"), "burn");
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = ForecastGenerator::default().generate("revenue", 0, today(), &mut rng);
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn test_oversized_period_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = ForecastGenerator::default();
        for period in [MAX_PERIOD + 1, 1_000_000_000, u32::MAX] {
            let result = generator.generate("revenue", period, today(), &mut rng);
            assert!(matches!(result, Err(CoreError::ValidationError { .. })));
        }

        let data = generator.generate("revenue", MAX_PERIOD, today(), &mut rng).unwrap();
        assert_eq!(data.chart_data.len(), 11);
        assert_eq!(data.chart_data.last().unwrap().date, today() + Duration::days(360));
    }

    #[test]
    fn test_non_finite_noise_is_dropped() {
        assert_eq!(ForecastGenerator::new(f64::INFINITY).noise, 0.0);
        assert_eq!(ForecastGenerator::new(f64::NAN).noise, 0.0);
        assert_eq!(ForecastGenerator::new(-3.0).noise, 0.0);
    }

    #[test]
    fn test_series_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = ForecastGenerator::default().generate("revenue", 30, today(), &mut rng).unwrap();
        assert_eq!(data.chart_data.len(), 11);
        assert_eq!(data.chart_data[0].date, today());
        assert_eq!(data.chart_data[10].date, today() + Duration::days(30));
        assert_eq!(data.confidence, 85);
        assert_eq!(data.insights.len(), 4);
        assert!(data.insights[0].contains("revenue") && data.insights[0].contains("30 days"));

        let ratio = data.projected_value / data.current_value;
        assert!(ratio >= 0.89 && ratio <= 1.31);
    }

    #[test]
    fn test_short_period_steps_daily() {
        let mut rng = StdRng::seed_from_u64(3);
        let data = ForecastGenerator::default().generate("expenses", 7, today(), &mut rng).unwrap();
        assert_eq!(data.chart_data.len(), 8);
    }

    #[test]
    fn test_noise_free_line_matches_trend() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = ForecastGenerator::new(0.0).generate("revenue", 90, today(), &mut rng).unwrap();
            let first = data.chart_data.first().unwrap().value;
            let last = data.chart_data.last().unwrap().value;
            assert_eq!(first as f64, data.current_value);
            assert!((last as f64 - data.projected_value).abs() <= 1.0);
            match data.trend {
                Trend::Up => assert!(last >= first),
                Trend::Down => assert!(last <= first),
                Trend::Stable => assert_eq!(last, first),
            }
        }
    }

    #[test]
    fn test_noise_stays_within_amplitude() {
        let mut rng = StdRng::seed_from_u64(11);
        let data = ForecastGenerator::default().generate("cashflow", 30, today(), &mut rng).unwrap();
        assert!((data.chart_data[0].value as f64 - data.current_value).abs() <= 501.0);
    }
}
