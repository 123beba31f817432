//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::dashboard: Summary cards and recent expenses
//! - routes::expenses: Expense list, edit, delete and natural-language entry
//! - routes::forecast: Metric forecasts and chart data
//! - routes::finance_flow: Payables/receivables split view, bulk actions, create wizard
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use finflow_config::Config;
use finflow_core::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger, PositionStore, ServiceRef,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};
pub use state::{PanelState, ViewState};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: ServiceRef,
    pub config: Config,
    pub view: Arc<RwLock<ViewState>>,
    pub layout_store: Arc<RwLock<PositionStore>>,
    pub error_logger: Arc<dyn ErrorLogger>,
}

impl AppState {
    pub fn new(config: Config, service: ServiceRef, layout_store: PositionStore) -> Self {
        let view = ViewState::new(&config, &layout_store);
        Self {
            service,
            config,
            view: Arc::new(RwLock::new(view)),
            layout_store: Arc::new(RwLock::new(layout_store)),
            error_logger: Arc::new(DefaultErrorLogger),
        }
    }

    /// Log a failed service call through the error logger
    pub fn report(&self, error: &CoreError, operation: &str) {
        self.error_logger.log_error(error, &ErrorContext::new(operation));
    }

    /// Report a failed call and convert it for a JSON response
    pub fn logged<T>(&self, result: CoreResult<T>, operation: &str) -> ApiResult<T> {
        result.map_err(|e| {
            self.report(&e, operation);
            ApiError::from(e)
        })
    }

    /// Format an amount with the configured currency settings
    pub fn money(&self, amount: f64) -> String {
        finflow_utils::format_currency(
            amount,
            &self.config.currency.symbol,
            self.config.currency.decimal_places as usize,
        )
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::dashboard::{api_dashboard, page_dashboard};
    use routes::expenses::{
        api_delete_expense, api_expenses, api_parse_expense, api_update_expense,
        htmx_expense_delete, htmx_expense_edit_form, htmx_expense_row, htmx_expense_update,
        htmx_expenses_list, htmx_parse_expense, page_add_expense, page_expenses,
    };
    use routes::finance_flow::{
        api_create_document, api_export, api_finance_flow, api_finance_rows, api_get_splitter,
        api_mark_paid, api_parties, api_set_splitter, htmx_basis, htmx_bucket, htmx_bulk_action,
        htmx_export_download, htmx_select_all, htmx_select_row, htmx_splitter,
        htmx_wizard_add_item, htmx_wizard_back, htmx_wizard_close, htmx_wizard_details,
        htmx_wizard_next, htmx_wizard_open, htmx_wizard_party, htmx_wizard_remove_item,
        htmx_wizard_search, htmx_wizard_submit, htmx_wizard_update_item, page_finance_flow,
    };
    use routes::forecast::{api_comprehensive_forecast, api_forecast, page_forecast};
    use routes::settings::{api_settings, page_settings};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/expenses", get(api_expenses).post(api_parse_expense))
        .route("/api/expenses/:id", put(api_update_expense).delete(api_delete_expense))
        .route("/api/forecast", get(api_forecast))
        .route("/api/forecast/all", get(api_comprehensive_forecast))
        .route("/api/finance-flow", get(api_finance_flow))
        .route("/api/finance-flow/:kind", get(api_finance_rows))
        .route("/api/finance-flow/:kind/mark-paid", post(api_mark_paid))
        .route("/api/finance-flow/:kind/export", post(api_export))
        .route("/api/parties/:kind", get(api_parties))
        .route("/api/documents", post(api_create_document))
        .route("/api/layout/splitter", get(api_get_splitter).put(api_set_splitter))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/dashboard", get(page_dashboard))
        .route("/expenses", get(page_expenses))
        .route("/expenses/add", get(page_add_expense))
        .route("/forecast", get(page_forecast))
        .route("/finance-flow", get(page_finance_flow))
        .route("/settings", get(page_settings))
        // HTMX partial routes
        .route("/expenses/list", get(htmx_expenses_list))
        .route("/expenses/parse", post(htmx_parse_expense))
        .route("/expenses/:id/row", get(htmx_expense_row))
        .route("/expenses/:id/edit", get(htmx_expense_edit_form))
        .route("/expenses/:id", put(htmx_expense_update).delete(htmx_expense_delete))
        .route("/finance-flow/basis", post(htmx_basis))
        .route("/finance-flow/splitter", post(htmx_splitter))
        .route("/finance-flow/wizard/open", post(htmx_wizard_open))
        .route("/finance-flow/wizard/close", post(htmx_wizard_close))
        .route("/finance-flow/wizard/search", post(htmx_wizard_search))
        .route("/finance-flow/wizard/party", post(htmx_wizard_party))
        .route("/finance-flow/wizard/next", post(htmx_wizard_next))
        .route("/finance-flow/wizard/back", post(htmx_wizard_back))
        .route("/finance-flow/wizard/items", post(htmx_wizard_add_item))
        .route("/finance-flow/wizard/items/:index", put(htmx_wizard_update_item))
        .route("/finance-flow/wizard/items/:index/remove", post(htmx_wizard_remove_item))
        .route("/finance-flow/wizard/details", post(htmx_wizard_details))
        .route("/finance-flow/wizard/submit", post(htmx_wizard_submit))
        .route("/finance-flow/:kind/bucket", post(htmx_bucket))
        .route("/finance-flow/:kind/select", post(htmx_select_row))
        .route("/finance-flow/:kind/select-all", post(htmx_select_all))
        .route("/finance-flow/:kind/bulk", post(htmx_bulk_action))
        .route("/finance-flow/:kind/export", get(htmx_export_download))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - FinanceFlow</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        title, content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/", "Dashboard", "dashboard"),
        ("/expenses", "Expenses", "expenses"),
        ("/expenses/add", "Add Expense", "add-expense"),
        ("/forecast", "Forecast", "forecast"),
        ("/finance-flow", "Finance Flow", "finance-flow"),
        ("/settings", "Settings", "settings"),
    ];

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>FinanceFlow</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, id) in &links {
        let is_active = match *path {
            "/" => current_path == "/" || current_path == "/dashboard",
            // "/expenses" must not light up on "/expenses/add"
            "/expenses" => current_path == "/expenses",
            _ => current_path.starts_with(path),
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        let icon = match *id {
            "dashboard" => "📊",
            "expenses" => "🧾",
            "add-expense" => "➕",
            "forecast" => "📈",
            "finance-flow" => "🔀",
            "settings" => "⚙️",
            _ => "📄",
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Check if request is from HTMX
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, current_path: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!(r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path), inner_content))
    }
}

/// Red notice fragment for a failed action
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<div class='bg-red-50 border border-red-200 rounded-lg p-4'><div class='flex items-center gap-2'><span class='text-red-600'>✗</span><span class='font-medium text-red-800'>{}</span></div></div>"#,
        finflow_utils::escape_html(message)
    )
}

/// Green notice fragment for a completed action
pub fn success_fragment(message: &str) -> String {
    format!(
        r#"<div class='bg-green-50 border border-green-200 rounded-lg p-4'><div class='flex items-center gap-2'><span class='text-green-600'>✓</span><span class='font-medium text-green-800'>{}</span></div></div>"#,
        finflow_utils::escape_html(message)
    )
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until the listener fails.
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting FinanceFlow server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Dashboard)");
    log::info!("  - /expenses (Expense list)");
    log::info!("  - /expenses/add (Natural-language entry)");
    log::info!("  - /forecast (Forecasts)");
    log::info!("  - /finance-flow (Payables and receivables)");
    log::info!("  - /settings (Configuration)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use chrono::NaiveDate;
    use finflow_core::{Clock, MockFinanceService};
    use tower::ServiceExt;

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    /// State over a zero-latency, seeded, date-pinned service
    pub async fn test_state(dir: &std::path::Path) -> AppState {
        let mut config = Config::default();
        config.data.path = dir.to_path_buf();
        config.service.latency_ms = 0;
        let service = MockFinanceService::from_config(&config)
            .with_seed(7)
            .with_clock(Clock::Fixed(today()));
        let store = PositionStore::load(&config.layout_path()).await.unwrap();
        AppState::new(config, Arc::new(service), store)
    }

    pub async fn send(state: &AppState, request: Request<Body>) -> Response<Body> {
        create_router(state.clone()).oneshot(request).await.unwrap()
    }

    pub async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn htmx_get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).header("hx-request", "true").body(Body::empty()).unwrap()
    }

    pub fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("hx-request", "true")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::{nav_sidebar, Config};
    use super::test_support::{body_string, get, htmx_get, send, test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let response = send(&state, get("/api/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_full_page_vs_partial() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;

        let full = body_string(send(&state, get("/settings")).await).await;
        assert!(full.starts_with("<!DOCTYPE html>"));
        assert!(full.contains("FinanceFlow</h1>"));

        let partial = body_string(send(&state, htmx_get("/settings")).await).await;
        assert!(partial.starts_with("<main"));
        assert!(!partial.contains("<aside"));
    }

    #[test]
    fn test_nav_active_link() {
        let nav = nav_sidebar("/expenses/add");
        let active = "bg-indigo-50 text-indigo-600'>➕";
        assert!(nav.contains(active));
        assert!(!nav.contains("bg-indigo-50 text-indigo-600'>🧾"));
        assert!(nav_sidebar("/dashboard").contains("bg-indigo-50 text-indigo-600'>📊"));
    }

    #[test]
    fn test_money_formatting() {
        let config = Config::default();
        assert_eq!(
            finflow_utils::format_currency(1250.0, &config.currency.symbol, config.currency.decimal_places as usize),
            "$1,250.00"
        );
    }
}
