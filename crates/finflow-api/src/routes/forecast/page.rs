//! Forecast page rendering

use crate::{error_fragment, page_response, AppState};
use axum::extract::Query;
use finflow_core::forecast::{metric_label, METRICS, PERIODS};
use finflow_core::{ChartPoint, ForecastData, Trend};
use finflow_utils::escape_html;
use std::collections::HashMap;

use super::forecast_params;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 160.0;

pub async fn page_forecast(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let (metric, period) = forecast_params(&state, &params);

    let metric_options: String = METRICS
        .iter()
        .map(|(key, label)| {
            format!(
                "<option value='{}' {}>{}</option>",
                key,
                if *key == metric { "selected" } else { "" },
                label
            )
        })
        .collect();
    let period_options: String = PERIODS
        .iter()
        .map(|p| {
            format!(
                "<option value='{}' {}>Next {} days</option>",
                p,
                if *p == period { "selected" } else { "" },
                p
            )
        })
        .collect();

    let result = match state.service.get_forecast(&metric, period).await {
        Ok(forecast) => forecast_panel(&state, &forecast),
        Err(e) if e.is_client_error() => error_fragment(&e.to_string()),
        Err(e) => {
            state.report(&e, "forecast");
            error_fragment("Unable to generate forecast. Please try again.")
        }
    };

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Financial Forecast</h2><p class='text-gray-500'>See where your business finances are heading based on current trends</p></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold'>Forecast Settings</h3>
            <p class='text-sm text-gray-500 mb-4'>Choose what you want to forecast and for how long</p>
            <form hx-get='/forecast' hx-target='main' hx-swap='outerHTML' hx-trigger='change' hx-indicator='#forecast-spinner' class='grid grid-cols-2 gap-4'>
                <label class='text-sm font-medium'>What to forecast
                    <select name='metric' class='mt-1 w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
                </label>
                <label class='text-sm font-medium'>Time period
                    <select name='period' class='mt-1 w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
                </label>
            </form>
            <span id='forecast-spinner' class='htmx-indicator text-sm text-gray-500'>Generating forecast...</span>
        </div>
        {}"#,
        metric_options, period_options, result
    );

    axum::response::Html(page_response(&headers, "Forecast", "/forecast", &inner_content))
}

fn forecast_panel(state: &AppState, forecast: &ForecastData) -> String {
    let (trend_class, trend_icon) = match forecast.trend {
        Trend::Up => ("text-green-600", "↑"),
        Trend::Down => ("text-red-600", "↓"),
        Trend::Stable => ("text-gray-600", "→"),
    };
    let change = if forecast.current_value != 0.0 {
        (forecast.projected_value - forecast.current_value) / forecast.current_value * 100.0
    } else {
        0.0
    };
    let insights: String = forecast
        .insights
        .iter()
        .map(|i| format!("<li class='p-3 bg-blue-50 rounded-lg text-sm'>{}</li>", escape_html(i)))
        .collect();
    // Dates and integers only, but keep `</` out of the script body regardless
    let chart_json = serde_json::to_string(&forecast.chart_data)
        .unwrap_or_default()
        .replace("</", "<\\/");

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>{label} Forecast <span class='{trend_class}'>{trend_icon} {trend}</span></h3>
            <div class='grid grid-cols-2 md:grid-cols-4 gap-4 mb-6'>
                <div><p class='text-sm text-gray-500'>Current</p><p class='text-2xl font-bold'>{current}</p></div>
                <div><p class='text-sm text-gray-500'>Projected</p><p class='text-2xl font-bold {trend_class}'>{projected}</p></div>
                <div><p class='text-sm text-gray-500'>Change</p><p class='text-2xl font-bold {trend_class}'>{change:+.1}%</p></div>
                <div><p class='text-sm text-gray-500'>Confidence</p><p class='text-2xl font-bold'>{confidence}%</p></div>
            </div>
            <p class='text-sm font-medium mb-2'>Timeline (next {period} days)</p>
            <svg id='forecast-chart' viewBox='0 0 {width} {height}' class='w-full h-40 bg-gray-50 rounded'>
                <polyline fill='none' stroke='#4f46e5' stroke-width='2' points='{points}'/>
            </svg>
            <script type='application/json' id='forecast-chart-data'>{chart_json}</script>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold'>💡 Insights &amp; Recommendations</h3>
            <p class='text-sm text-gray-500 mb-4'>What this forecast means for your business</p>
            <ul class='space-y-2'>{insights}</ul>
        </div>"#,
        label = escape_html(metric_label(&forecast.metric)),
        trend = forecast.trend,
        current = state.money(forecast.current_value),
        projected = state.money(forecast.projected_value),
        confidence = forecast.confidence,
        period = forecast.period,
        width = CHART_WIDTH,
        height = CHART_HEIGHT,
        points = polyline_points(&forecast.chart_data),
    )
}

/// Scale chart values into the SVG viewbox
fn polyline_points(points: &[ChartPoint]) -> String {
    let (min, max) = points.iter().fold((i64::MAX, i64::MIN), |(lo, hi), p| {
        (lo.min(p.value), hi.max(p.value))
    });
    let span = (max - min).max(1) as f64;
    let last = points.len().saturating_sub(1).max(1) as f64;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = i as f64 / last * CHART_WIDTH;
            let y = CHART_HEIGHT - (p.value - min) as f64 / span * CHART_HEIGHT;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
