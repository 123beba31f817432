//! Dashboard API endpoints - JSON API

use crate::{ApiResult, AppState};
use finflow_core::ExpenseStats;

use super::RECENT_EXPENSES;

/// Summary figures, newest expenses and per-category totals
pub async fn api_dashboard(state: axum::extract::State<AppState>) -> ApiResult<String> {
    let summary = state.logged(state.service.get_dashboard_summary().await, "dashboard")?;
    let mut expenses = state.logged(state.service.get_expenses().await, "dashboard")?;
    let stats = ExpenseStats::from_expenses(&expenses);
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
    expenses.truncate(RECENT_EXPENSES);

    Ok(serde_json::to_string(&serde_json::json!({
        "summary": summary,
        "recent_expenses": expenses,
        "stats": stats,
    }))
    .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;

    #[tokio::test]
    async fn test_dashboard_json() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/dashboard")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["summary"]["cash_flow"], 15420.0);
        assert_eq!(value["summary"]["runway"], 90);
        let recent = value["recent_expenses"].as_array().unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0]["id"], "1");
        assert_eq!(value["stats"]["count"], 5);
    }
}
