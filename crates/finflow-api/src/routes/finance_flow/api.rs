//! Finance flow JSON API handlers

use crate::{AppState, ApiError, ApiResult};
use axum::extract::{Path, Query};
use axum::response::Response;
use axum::Json;
use finflow_core::aging::filter_by_bucket;
use finflow_core::{AgingRange, CoreResult, DocumentKind, NewFinanceDocument, SplitterState};
use serde::Deserialize;
use std::collections::HashMap;

use super::csv_response;
use crate::routes::parse_kind;

#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SplitterRequest {
    pub position: f64,
}

/// Snap and clamp a dragged position, then store it
pub(crate) async fn apply_splitter(state: &AppState, raw: f64) -> CoreResult<SplitterState> {
    let splitter = {
        let mut view = state.view.write().await;
        view.splitter = view.splitter.drag_to(raw);
        view.splitter
    };
    state
        .layout_store
        .write()
        .await
        .set(&state.config.layout.storage_key, splitter.to_stored())
        .await?;
    log::debug!("Splitter moved to {}%", splitter.position);
    Ok(splitter)
}

/// API: Both tables, totals, aging and insights
pub async fn api_finance_flow(state: axum::extract::State<AppState>) -> ApiResult<String> {
    let data = state.logged(state.service.get_finance_flow().await, "finance_flow")?;
    Ok(serde_json::to_string(&data).unwrap_or_default())
}

/// API: Rows of one table, optionally filtered by `?bucket=0-30`
pub async fn api_finance_rows(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<String> {
    let kind = parse_kind(&kind)?;
    let bucket = match params.get("bucket").filter(|b| !b.is_empty()) {
        Some(raw) => Some(raw.parse::<AgingRange>().map_err(ApiError::bad_request)?),
        None => None,
    };

    let data = state.logged(state.service.get_finance_flow().await, "finance_flow")?;
    let today = state.service.today();
    let convention = state.config.finance.aging_convention;
    let rows = match kind {
        DocumentKind::Payable => {
            serde_json::to_value(filter_by_bucket(&data.payables, bucket, today, convention))
        }
        DocumentKind::Receivable => {
            serde_json::to_value(filter_by_bucket(&data.receivables, bucket, today, convention))
        }
    }
    .unwrap_or_default();

    let count = rows.as_array().map(Vec::len).unwrap_or(0);
    Ok(serde_json::json!({ "kind": kind, "bucket": bucket, "rows": rows, "count": count }).to_string())
}

pub async fn api_mark_paid(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<IdsRequest>,
) -> ApiResult<String> {
    let kind = parse_kind(&kind)?;
    if request.ids.is_empty() {
        return Err(ApiError::bad_request("Select at least one row"));
    }
    let result = state.logged(state.service.mark_paid(kind, &request.ids).await, "mark_paid")?;
    Ok(serde_json::to_string(&result).unwrap_or_default())
}

/// API: CSV of the given ids, every row when the list is empty
pub async fn api_export(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Json(request): Json<IdsRequest>,
) -> ApiResult<Response> {
    let kind = parse_kind(&kind)?;
    let bytes = state.logged(state.service.export_csv(kind, &request.ids).await, "export_csv")?;
    Ok(csv_response(kind, state.service.today(), bytes))
}

/// API: Vendors or customers
pub async fn api_parties(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<String> {
    let kind = parse_kind(&kind)?;
    let parties = state.logged(state.service.parties(kind).await, "parties")?;
    Ok(serde_json::to_string(&parties).unwrap_or_default())
}

pub async fn api_create_document(
    state: axum::extract::State<AppState>,
    Json(doc): Json<NewFinanceDocument>,
) -> ApiResult<String> {
    let id = state.logged(state.service.create_document(doc).await, "create_document")?;
    Ok(serde_json::json!({ "success": true, "id": id }).to_string())
}

pub async fn api_get_splitter(state: axum::extract::State<AppState>) -> ApiResult<String> {
    let splitter = state.view.read().await.splitter;
    Ok(serde_json::to_string(&splitter).unwrap_or_default())
}

pub async fn api_set_splitter(
    state: axum::extract::State<AppState>,
    Json(request): Json<SplitterRequest>,
) -> ApiResult<String> {
    if !request.position.is_finite() {
        return Err(ApiError::bad_request("Invalid splitter position"));
    }
    let splitter = state.logged(apply_splitter(&state, request.position).await, "store_splitter")?;
    Ok(serde_json::to_string(&splitter).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    async fn json_body(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_finance_flow_totals() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = json_body(send(&state, get("/api/finance-flow")).await).await;
        assert_eq!(body["total_payables"], 13_480.0);
        assert_eq!(body["payables"].as_array().unwrap().len(), 8);
        assert_eq!(body["payable_aging"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_rows_filtered_by_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let body = json_body(send(&state, get("/api/finance-flow/receivables?bucket=0-30")).await).await;
        assert_eq!(body["count"], 2);
        assert_eq!(body["rows"][0]["id"], "r1");

        let body = json_body(send(&state, get("/api/finance-flow/payables")).await).await;
        assert_eq!(body["count"], 8);

        let response = send(&state, get("/api/finance-flow/payables?bucket=soon")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&state, get("/api/finance-flow/ledger")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mark_paid_reports_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let response = send(
            &state,
            json("POST", "/api/finance-flow/payables/mark-paid", json!({ "ids": ["p1", "p99"] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["updated"], json!(["p1"]));
        assert_eq!(body["unknown"], json!(["p99"]));

        let response = send(
            &state,
            json("POST", "/api/finance-flow/payables/mark-paid", json!({ "ids": [] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_export_all_rows() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let response = send(&state, json("POST", "/api/finance-flow/payables/export", json!({}))).await;
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"payables-2024-05-01.csv\""
        );
        let csv = body_string(response).await;
        assert_eq!(csv.lines().count(), 9);
    }

    #[tokio::test]
    async fn test_parties_and_create_document() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = json_body(send(&state, get("/api/parties/receivables")).await).await;
        assert_eq!(body[0]["name"], "ABC Corporation");

        let doc = json!({
            "kind": "receivable",
            "party_id": "c2",
            "items": [{ "description": "Design work", "quantity": 3.0, "rate": 150.0, "tax_code": "TAX001", "amount": 450.0 }],
            "terms": "Net 15",
            "date": "2024-05-01",
            "is_draft": false
        });
        let body = json_body(send(&state, json("POST", "/api/documents", doc)).await).await;
        assert_eq!(body["success"], true);
        let id = body["id"].as_str().unwrap().to_string();

        let flow = state.service.get_finance_flow().await.unwrap();
        let created = flow.receivables.iter().find(|r| r.id == id).unwrap();
        assert_eq!(created.due_date.to_string(), "2024-05-16");
    }

    #[tokio::test]
    async fn test_create_document_unknown_party() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let doc = json!({
            "kind": "payable",
            "party_id": "nobody",
            "items": [{ "description": "Paper", "quantity": 1.0, "rate": 10.0, "tax_code": "TAX001", "amount": 10.0 }],
            "terms": "Net 30",
            "date": "2024-05-20",
            "is_draft": false
        });
        let response = send(&state, json("POST", "/api/documents", doc)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_document_stores_computed_amounts() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let doc = json!({
            "kind": "payable",
            "party_id": "v1",
            "items": [{ "description": "Toner", "quantity": 2.0, "rate": 30.0, "tax_code": "TAX001", "amount": 999.0 }],
            "terms": "Net 30",
            "date": "2024-05-20",
            "is_draft": false
        });
        let body = json_body(send(&state, json("POST", "/api/documents", doc)).await).await;
        let id = body["id"].as_str().unwrap().to_string();

        let flow = state.service.get_finance_flow().await.unwrap();
        let created = flow.payables.iter().find(|p| p.id == id).unwrap();
        assert_eq!(created.amount, 60.0);
        assert_eq!(created.items.as_ref().unwrap()[0].amount, 60.0);
    }

    #[tokio::test]
    async fn test_create_document_rejects_bad_lines_and_terms() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let bad_lines = json!({
            "kind": "payable",
            "party_id": "v1",
            "items": [
                { "description": "", "quantity": 1.0, "rate": 1.0, "tax_code": "TAX001", "amount": 999.0 },
                { "description": "Chairs", "quantity": -5.0, "rate": 10.0, "tax_code": "TAX001", "amount": -50.0 }
            ],
            "terms": "Net 30",
            "date": "2024-05-20",
            "is_draft": false
        });
        let bad_terms = json!({
            "kind": "receivable",
            "party_id": "c1",
            "items": [{ "description": "Hosting", "quantity": 1.0, "rate": 40.0, "tax_code": "TAX001", "amount": 40.0 }],
            "terms": "Net 100000000",
            "date": "2024-05-01",
            "is_draft": false
        });
        for doc in [bad_lines, bad_terms] {
            let response = send(&state, json("POST", "/api/documents", doc)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await["success"], false);
        }

        let flow = state.service.get_finance_flow().await.unwrap();
        assert_eq!(flow.payables.len(), 8);
        assert_eq!(flow.receivables.len(), 7);
    }

    #[tokio::test]
    async fn test_splitter_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let body = json_body(send(&state, get("/api/layout/splitter")).await).await;
        assert_eq!(body["position"], 50.0);

        let body = json_body(
            send(&state, json("PUT", "/api/layout/splitter", json!({ "position": 74.2 }))).await,
        )
        .await;
        // snaps to 75, then clamps to the maximum
        assert_eq!(body["position"], 70.0);
        assert_eq!(body["max"], 70.0);

        let store = finflow_core::PositionStore::load(&state.config.layout_path()).await.unwrap();
        assert_eq!(store.get(&state.config.layout.storage_key), Some("70"));
    }
}
