//! Expense API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_expenses: Expense list with optional search (JSON)
//! - api_parse_expense: Natural-language entry (JSON)
//! - api_update_expense / api_delete_expense: Edit and remove (JSON)
//! - htmx_expenses_list: Filtered table (HTML fragment)
//! - htmx_expense_row / htmx_expense_edit_form: Row display and inline form
//! - htmx_expense_update / htmx_expense_delete: Row mutations
//! - htmx_parse_expense: Entry form result (HTML fragment)

use crate::{error_fragment, ApiResult, AppState};
use axum::extract::{Path, Query};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use chrono::NaiveDate;
use finflow_core::reports::search_expenses;
use finflow_core::service::PARSE_FAILURE_MESSAGE;
use finflow_core::{CoreError, ExpensePatch};
use serde::Deserialize;
use std::collections::HashMap;

use super::page::{expense_edit_row, expense_row, expenses_table, page_offset, parse_result};

pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete expense. Please try again.";
pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update expense. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// Expenses, optionally filtered by `q` (JSON API)
pub async fn api_expenses(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<String> {
    let expenses = state.logged(state.service.get_expenses().await, "list_expenses")?;
    let query = params.get("q").map(|s| s.trim()).unwrap_or("");
    let matching = search_expenses(&expenses, query);
    let total: f64 = matching.iter().map(|e| e.amount).sum();

    Ok(serde_json::to_string(&serde_json::json!({
        "expenses": matching,
        "total": total,
        "count": matching.len(),
    }))
    .unwrap_or_default())
}

/// Extract and store an expense from free text (JSON API)
pub async fn api_parse_expense(
    state: axum::extract::State<AppState>,
    Json(request): Json<ParseRequest>,
) -> ApiResult<String> {
    let response = state.logged(state.service.parse_expense(&request.text).await, "parse_expense")?;
    Ok(serde_json::to_string(&response).unwrap_or_default())
}

/// Merge a partial update onto an expense (JSON API)
pub async fn api_update_expense(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ExpensePatch>,
) -> ApiResult<String> {
    let expense = state.logged(state.service.update_expense(&id, patch).await, "update_expense")?;
    Ok(serde_json::to_string(&expense).unwrap_or_default())
}

pub async fn api_delete_expense(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.logged(state.service.delete_expense(&id).await, "delete_expense")?;
    Ok(serde_json::json!({ "success": true, "id": id }).to_string())
}

/// HTMX: Filtered expense table
pub async fn htmx_expenses_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let query = params.get("q").map(|s| s.trim()).unwrap_or("");
    let offset = page_offset(&params);
    match state.service.get_expenses().await {
        Ok(expenses) => Html(expenses_table(&state, &expenses, query, offset)),
        Err(e) => {
            state.report(&e, "list_expenses");
            Html(error_fragment("Error loading expenses"))
        }
    }
}

/// HTMX: Plain row, used to cancel an inline edit
pub async fn htmx_expense_row(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match find_expense(&state, &id).await {
        Ok(expense) => Html(expense_row(&state, &expense)).into_response(),
        Err(e) => notice(&state, e, "load_expense", "Expense not found"),
    }
}

/// HTMX: Inline edit form for one row
pub async fn htmx_expense_edit_form(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match find_expense(&state, &id).await {
        Ok(expense) => Html(expense_edit_row(&expense)).into_response(),
        Err(e) => notice(&state, e, "load_expense", "Expense not found"),
    }
}

/// HTMX: Save an inline edit; the row is only replaced on success
pub async fn htmx_expense_update(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let patch = match patch_from_form(&params) {
        Ok(patch) => patch,
        Err(message) => return retarget_notice(error_fragment(&message)),
    };
    match state.service.update_expense(&id, patch).await {
        Ok(expense) => Html(expense_row(&state, &expense)).into_response(),
        Err(e) => notice(&state, e, "update_expense", UPDATE_FAILURE_MESSAGE),
    }
}

/// HTMX: Delete a row; on failure the row stays and a notice is shown
pub async fn htmx_expense_delete(
    state: axum::extract::State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.service.delete_expense(&id).await {
        Ok(()) => Html(String::new()).into_response(),
        Err(e) => {
            state.report(&e, "delete_expense");
            retarget_notice(error_fragment(DELETE_FAILURE_MESSAGE))
        }
    }
}

/// HTMX: Natural-language entry result
pub async fn htmx_parse_expense(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Html<String> {
    let text = params.get("text").map(String::as_str).unwrap_or("");
    match state.service.parse_expense(text).await {
        Ok(response) => Html(parse_result(&state, &response)),
        Err(e) if e.is_client_error() => Html(error_fragment(&client_message(&e))),
        Err(e) => {
            state.report(&e, "parse_expense");
            Html(error_fragment(PARSE_FAILURE_MESSAGE))
        }
    }
}

async fn find_expense(state: &AppState, id: &str) -> Result<finflow_core::Expense, CoreError> {
    state
        .service
        .get_expenses()
        .await?
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })
}

/// Form fields to a patch; blank fields are left unchanged
pub fn patch_from_form(params: &HashMap<String, String>) -> Result<ExpensePatch, String> {
    let text = |key: &str| {
        params
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let amount = match text("amount") {
        Some(raw) => Some(
            raw.parse::<f64>()
                .ok()
                .filter(|a| a.is_finite())
                .ok_or_else(|| format!("Invalid amount: {}", raw))?,
        ),
        None => None,
    };
    let date = match text("date") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| format!("Invalid date: {}", raw))?,
        ),
        None => None,
    };

    Ok(ExpensePatch {
        date,
        description: text("description"),
        category: text("category"),
        payment_method: text("payment_method"),
        amount,
    })
}

/// Validation messages are shown as-is; anything else gets `fallback`
fn notice(state: &AppState, error: CoreError, operation: &str, fallback: &str) -> Response {
    state.report(&error, operation);
    let message = if matches!(error, CoreError::ValidationError { .. }) {
        client_message(&error)
    } else {
        fallback.to_string()
    };
    retarget_notice(error_fragment(&message))
}

fn client_message(error: &CoreError) -> String {
    match error {
        CoreError::ValidationError { message } => message.clone(),
        other => other.to_string(),
    }
}

/// Send a fragment to the page notice area instead of the triggering row
fn retarget_notice(fragment: String) -> Response {
    (
        [("HX-Retarget", "#expenses-notice"), ("HX-Reswap", "innerHTML")],
        Html(fragment),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_api_expenses_search() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, get("/api/expenses?q=software")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["expenses"][0]["id"], "3");
        assert_eq!(value["total"], 99.0);
    }

    #[tokio::test]
    async fn test_api_parse_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let response = send(
            &state,
            json("POST", "/api/expenses", serde_json::json!({ "text": "Gas for delivery truck $45 cash" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["expense"]["amount"], 45.0);
        assert_eq!(value["expense"]["category"], "Transportation");
        assert_eq!(value["expense"]["payment_method"], "Cash");

        let body = body_string(send(&state, get("/api/expenses")).await).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["count"], 6);
    }

    #[tokio::test]
    async fn test_api_blank_parse_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let response = send(&state, json("POST", "/api/expenses", serde_json::json!({ "text": "  " }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_update_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let response = send(&state, json("PUT", "/api/expenses/2", serde_json::json!({ "amount": 650.0 }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["amount"], 650.0);
        assert_eq!(value["description"], "Marketing ads");

        let delete = axum::http::Request::builder()
            .method("DELETE")
            .uri("/api/expenses/2")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(send(&state, delete).await.status(), StatusCode::OK);

        let missing = axum::http::Request::builder()
            .method("DELETE")
            .uri("/api/expenses/2")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(send(&state, missing).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_htmx_delete_failure_keeps_row() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let ok = send(&state, form("DELETE", "/expenses/1", "")).await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(body_string(ok).await, "");

        let failed = send(&state, form("DELETE", "/expenses/1", "")).await;
        assert_eq!(failed.headers()["HX-Retarget"], "#expenses-notice");
        assert!(body_string(failed).await.contains(DELETE_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_htmx_inline_edit() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let edit = body_string(send(&state, htmx_get("/expenses/4/edit")).await).await;
        assert!(edit.contains("name='amount' value='75'"));

        let saved = send(&state, form("PUT", "/expenses/4", "description=Fuel&amount=80&category=")).await;
        let body = body_string(saved).await;
        assert!(body.contains("Fuel"));
        assert!(body.contains("$80.00"));
        assert!(body.contains("Transportation"));

        let rejected = send(&state, form("PUT", "/expenses/4", "amount=-5")).await;
        assert_eq!(rejected.headers()["HX-Retarget"], "#expenses-notice");
        let row = body_string(send(&state, htmx_get("/expenses/4/row")).await).await;
        assert!(row.contains("$80.00"));
    }

    #[tokio::test]
    async fn test_htmx_parse_result() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let body = body_string(
            send(&state, form("POST", "/expenses/parse", "text=Bought+office+supplies+for+%2475+with+card")).await,
        )
        .await;
        assert!(body.contains("Expense added successfully!"));
        assert!(body.contains("$75.00"));
        assert!(body.contains("Office &amp; Admin"));

        let blank = body_string(send(&state, form("POST", "/expenses/parse", "text=")).await).await;
        assert!(blank.contains("Please describe the expense"));
    }

    #[test]
    fn test_patch_from_form() {
        let mut params = HashMap::new();
        params.insert("amount".to_string(), "12.5".to_string());
        params.insert("category".to_string(), "  ".to_string());
        let patch = patch_from_form(&params).unwrap();
        assert_eq!(patch.amount, Some(12.5));
        assert_eq!(patch.category, None);

        params.insert("amount".to_string(), "abc".to_string());
        assert!(patch_from_form(&params).is_err());
        params.insert("amount".to_string(), "1".to_string());
        params.insert("date".to_string(), "2024-13-01".to_string());
        assert!(patch_from_form(&params).is_err());
    }
}
