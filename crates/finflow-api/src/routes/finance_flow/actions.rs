//! Finance flow table actions - HTMX partial responses
//!
//! Every handler mutates the view state (or the service) and answers with
//! the re-rendered `#finance-flow` element.

use crate::routes::{form_flag, parse_kind};
use crate::{AppState, ApiError};
use axum::extract::Path;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use finflow_core::{AgingRange, BulkAction, FinanceBasis, SelectionAction};
use std::collections::HashMap;

use super::page::Notice;
use super::{csv_response, kind_segment, refresh, visible_for};

/// HTMX: Toggle the aging filter; selection is pruned to what stays visible
pub async fn htmx_bucket(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let range = match params.get("range").map(|r| r.parse::<AgingRange>()) {
        Some(Ok(range)) => range,
        _ => return ApiError::bad_request("Unknown aging range").into_response(),
    };

    let data = match state.service.get_finance_flow().await {
        Ok(data) => data,
        Err(e) => {
            state.report(&e, "finance_flow");
            return ApiError::from(e).into_response();
        }
    };
    {
        let mut view = state.view.write().await;
        let panel = view.panel_mut(kind);
        panel.bucket = finflow_core::aging::toggle_bucket(panel.bucket, range);
        let visible = visible_for(&state, &data, kind, panel.bucket);
        panel.selection = panel.selection.reduce(SelectionAction::Prune { visible });
        log::debug!("{} filter set to {:?}", kind_segment(kind), panel.bucket);
    }
    refresh(&state, None).await.into_response()
}

/// HTMX: Row checkbox; only rows in the filtered view can be checked
pub async fn htmx_select_row(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let Some(id) = params.get("id").filter(|id| !id.is_empty()) else {
        return ApiError::bad_request("Missing row id").into_response();
    };
    let checked = form_flag(&params, "checked");
    let data = match state.service.get_finance_flow().await {
        Ok(data) => data,
        Err(e) => {
            state.report(&e, "finance_flow");
            return ApiError::from(e).into_response();
        }
    };
    {
        let mut view = state.view.write().await;
        let bucket = view.panel(kind).bucket;
        let visible = visible_for(&state, &data, kind, bucket);
        let panel = view.panel_mut(kind);
        if checked && !visible.contains(id) {
            log::debug!("Ignoring selection of {} outside the {} view", id, kind_segment(kind));
        } else {
            panel.selection = panel.selection.reduce(SelectionAction::Toggle {
                id: id.clone(),
                checked,
            });
        }
    }
    refresh(&state, None).await.into_response()
}

/// HTMX: Header checkbox selects exactly the visible rows, or none
pub async fn htmx_select_all(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let checked = form_flag(&params, "checked");
    let data = match state.service.get_finance_flow().await {
        Ok(data) => data,
        Err(e) => {
            state.report(&e, "finance_flow");
            return ApiError::from(e).into_response();
        }
    };
    {
        let mut view = state.view.write().await;
        let bucket = view.panel(kind).bucket;
        let visible = visible_for(&state, &data, kind, bucket);
        let panel = view.panel_mut(kind);
        panel.selection = panel.selection.reduce(SelectionAction::SelectAll { visible, checked });
    }
    refresh(&state, None).await.into_response()
}

/// HTMX: Bulk action over the selected rows
///
/// Mark-paid updates the documents and clears the selection. Export sends
/// the browser to the CSV download.
pub async fn htmx_bulk_action(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let action = match params.get("action").map(|a| a.parse::<BulkAction>()) {
        Some(Ok(action)) => action,
        _ => return ApiError::bad_request("Unknown bulk action").into_response(),
    };
    let ids = state.view.read().await.panel(kind).selection.ids();
    if ids.is_empty() {
        return refresh(&state, Some(Notice::Error("Select at least one row".to_string())))
            .await
            .into_response();
    }

    match action {
        BulkAction::MarkPaid => match state.service.mark_paid(kind, &ids).await {
            Ok(result) => {
                {
                    let mut view = state.view.write().await;
                    let panel = view.panel_mut(kind);
                    panel.selection = panel.selection.reduce(SelectionAction::Clear);
                }
                let mut message = action.confirmation(kind).to_string();
                if !result.unknown.is_empty() {
                    message.push_str(&format!(" ({} no longer exist)", result.unknown.len()));
                }
                refresh(&state, Some(Notice::Success(message))).await.into_response()
            }
            Err(e) => {
                state.report(&e, "mark_paid");
                refresh(&state, Some(Notice::Error("Failed to update. Please try again.".to_string())))
                    .await
                    .into_response()
            }
        },
        BulkAction::Export => {
            log::info!("{} for {} {}(s)", action.confirmation(kind), ids.len(), kind);
            (
                [("HX-Redirect", format!("/finance-flow/{}/export", kind_segment(kind)))],
                Html(String::new()),
            )
                .into_response()
        }
    }
}

/// CSV download of the current selection; nothing selected exports every row
pub async fn htmx_export_download(
    state: axum::extract::State<AppState>,
    Path(kind): Path<String>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let ids = state.view.read().await.panel(kind).selection.ids();
    match state.logged(state.service.export_csv(kind, &ids).await, "export_csv") {
        Ok(bytes) => csv_response(kind, state.service.today(), bytes),
        Err(e) => e.into_response(),
    }
}

/// HTMX: Accounting basis toggle
pub async fn htmx_basis(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let basis = match params.get("basis").map(|b| b.parse::<FinanceBasis>()) {
        Some(Ok(basis)) => basis,
        _ => return ApiError::bad_request("Unknown finance basis").into_response(),
    };
    state.view.write().await.basis = basis;
    log::debug!("Finance basis set to {}", basis);
    refresh(&state, None).await.into_response()
}

/// HTMX: Splitter released at `position` percent; snapped, clamped and stored
pub async fn htmx_splitter(
    state: axum::extract::State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    let Some(raw) = params.get("position").and_then(|p| p.trim().parse::<f64>().ok()) else {
        return ApiError::bad_request("Invalid splitter position").into_response();
    };
    let notice = match super::api::apply_splitter(&state, raw).await {
        Ok(_) => None,
        Err(e) => {
            state.report(&e, "store_splitter");
            Some(Notice::Error("Could not save the layout".to_string()))
        }
    };
    refresh(&state, notice).await.into_response()
}
