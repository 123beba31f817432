//! Settings API endpoints - JSON API

use crate::AppState;

/// Effective configuration plus the active extraction backend
pub async fn api_settings(state: axum::extract::State<AppState>) -> String {
    serde_json::to_string(&serde_json::json!({
        "config": &state.config,
        "parser": state.service.parser_name(),
    }))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;

    #[tokio::test]
    async fn test_settings_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/settings")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["parser"], "rule-table");
        assert_eq!(value["config"]["server"]["port"], 8081);
        assert_eq!(value["config"]["service"]["latency_ms"], 0);
    }
}
