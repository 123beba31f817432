//! Finance flow routes - Payables/receivables split view
//!
//! Aging filters, row selection and bulk actions, the accounting basis
//! toggle, the draggable splitter and the create-bill/invoice wizard.

pub mod actions;
pub mod api;
pub mod page;
pub mod wizard;

pub use actions::{
    htmx_basis, htmx_bucket, htmx_bulk_action, htmx_export_download, htmx_select_all,
    htmx_select_row, htmx_splitter,
};
pub use api::{
    api_create_document, api_export, api_finance_flow, api_finance_rows, api_get_splitter,
    api_mark_paid, api_parties, api_set_splitter,
};
pub use page::page_finance_flow;
pub use wizard::{
    htmx_wizard_add_item, htmx_wizard_back, htmx_wizard_close, htmx_wizard_details,
    htmx_wizard_next, htmx_wizard_open, htmx_wizard_party, htmx_wizard_remove_item,
    htmx_wizard_search, htmx_wizard_submit, htmx_wizard_update_item,
};

use crate::AppState;
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use chrono::NaiveDate;
use finflow_core::aging::filter_by_bucket;
use finflow_core::export::export_filename;
use finflow_core::{AgingRange, DocumentKind, FinanceFlowData, FinanceRecord};

use page::{render_finance_flow, Notice};
use wizard::current_wizard;

/// Path segment for a table
pub fn kind_segment(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Payable => "payables",
        DocumentKind::Receivable => "receivables",
    }
}

pub fn visible_ids<T: FinanceRecord>(rows: &[&T]) -> Vec<String> {
    rows.iter().map(|row| row.id().to_string()).collect()
}

/// Ids of the rows a table shows under `bucket`
pub(crate) fn visible_for(
    state: &AppState,
    data: &FinanceFlowData,
    kind: DocumentKind,
    bucket: Option<AgingRange>,
) -> Vec<String> {
    let today = state.service.today();
    let convention = state.config.finance.aging_convention;
    match kind {
        DocumentKind::Payable => visible_ids(&filter_by_bucket(&data.payables, bucket, today, convention)),
        DocumentKind::Receivable => {
            visible_ids(&filter_by_bucket(&data.receivables, bucket, today, convention))
        }
    }
}

/// Re-render `#finance-flow` from fresh data
pub(crate) async fn refresh(state: &AppState, notice: Option<Notice>) -> Html<String> {
    match state.service.get_finance_flow().await {
        Ok(data) => {
            let wizard = current_wizard(state).await;
            let view = state.view.read().await;
            Html(render_finance_flow(state, &data, &view, notice, &wizard))
        }
        Err(e) => {
            state.report(&e, "finance_flow");
            Html(format!(
                "<div id='finance-flow'>{}</div>",
                crate::error_fragment("Error loading finance data")
            ))
        }
    }
}

/// CSV attachment named after the table and date
pub(crate) fn csv_response(kind: DocumentKind, today: NaiveDate, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export_filename(kind, today));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}
