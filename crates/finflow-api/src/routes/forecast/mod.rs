//! Forecast routes - Metric projections and chart data

pub mod api;
pub mod page;

pub use api::{api_comprehensive_forecast, api_forecast};
pub use page::page_forecast;

use crate::AppState;
use std::collections::HashMap;

/// `metric` and `period` query parameters, falling back to configured defaults
pub(crate) fn forecast_params(state: &AppState, params: &HashMap<String, String>) -> (String, u32) {
    let metric = params
        .get("metric")
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .unwrap_or(&state.config.forecast.default_metric)
        .to_string();
    let period = params
        .get("period")
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(state.config.forecast.default_period);
    (metric, period)
}
