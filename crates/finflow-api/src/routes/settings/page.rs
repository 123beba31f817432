//! Settings page rendering - Full page endpoints

use crate::{page_response, AppState};
use finflow_utils::escape_html;

pub async fn page_settings(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let config = &state.config;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Server</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Host</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Port</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Data service</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>API base URL</p><p class='font-medium' id='api-base-url'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Simulated latency</p><p class='font-medium'>{} ms</p></div>
                <div><p class='text-sm text-gray-500'>Expense parser</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Layout store</p><p class='font-medium'>{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>Finance</h3>
            <div class='grid grid-cols-2 gap-4 mb-4'>
                <div><p class='text-sm text-gray-500'>Aging convention</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Default basis</p><p class='font-medium'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Currency</p><p class='font-medium'>{} ({} decimals)</p></div>
                <div><p class='text-sm text-gray-500'>Forecast noise</p><p class='font-medium'>±{}</p></div>
            </div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Pagination</h3>
            <div><p class='text-sm text-gray-500'>Records per page</p><p class='font-medium'>{}</p></div>
        </div>"#,
        escape_html(&config.server.host),
        config.server.port,
        escape_html(&config.service.api_base_url),
        config.service.latency_ms,
        state.service.parser_name(),
        escape_html(&config.layout_path().display().to_string()),
        config.finance.aging_convention,
        config.finance.default_basis,
        escape_html(&config.currency.symbol),
        config.currency.decimal_places,
        config.forecast.noise,
        config.pagination.records_per_page
    );

    axum::response::Html(page_response(&headers, "Settings", "/settings", &inner_content))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;

    #[tokio::test]
    async fn test_settings_page_shows_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        let body = body_string(send(&state, htmx_get("/settings")).await).await;
        assert!(body.contains("http://localhost:8000"));
        assert!(body.contains("rule-table"));
        assert!(body.contains("as_written"));
    }
}
