//! Forecast API endpoints - JSON API

use crate::{ApiResult, AppState};
use axum::extract::Query;
use std::collections::HashMap;

use super::forecast_params;

/// One metric over `period` days (JSON API)
pub async fn api_forecast(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<String> {
    let (metric, period) = forecast_params(&state, &params);
    let forecast = state.logged(state.service.get_forecast(&metric, period).await, "forecast")?;
    Ok(serde_json::to_string(&forecast).unwrap_or_default())
}

/// Every metric over `period` days (JSON API)
pub async fn api_comprehensive_forecast(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<String> {
    let (_, period) = forecast_params(&state, &params);
    let forecasts = state.logged(
        state.service.get_comprehensive_forecast(period).await,
        "comprehensive_forecast",
    )?;
    Ok(serde_json::to_string(&forecasts).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_forecast_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/forecast?metric=expenses&period=30")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["metric"], "expenses");
        assert_eq!(value["current_value"], 29780.0);
        assert_eq!(value["confidence"], 85);
        // points at 0, 3, ..., 30
        assert_eq!(value["chart_data"].as_array().unwrap().len(), 11);
        assert_eq!(value["chart_data"][0]["date"], "2024-05-01");
    }

    #[tokio::test]
    async fn test_forecast_defaults_and_zero_period() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/forecast")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["metric"], "revenue");
        assert_eq!(value["period"], 30);

        let response = send(&state, get("/api/forecast?period=0")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_period_beyond_a_year() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        for uri in [
            "/api/forecast?metric=revenue&period=1000000000",
            "/api/forecast?period=4294967295",
            "/api/forecast/all?period=366",
        ] {
            let response = send(&state, get(uri)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        }

        let response = send(&state, get("/api/forecast?period=365")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_comprehensive_forecast() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/forecast/all?period=7")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        let metrics: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["metric"].as_str().unwrap())
            .collect();
        assert_eq!(metrics, vec!["revenue", "expenses", "profit", "cashflow"]);
    }
}
