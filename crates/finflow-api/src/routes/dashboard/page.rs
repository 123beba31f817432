//! Dashboard page rendering - Full page endpoints

use crate::{error_fragment, page_response, AppState};
use finflow_core::Expense;
use finflow_utils::escape_html;

use super::RECENT_EXPENSES;

pub async fn page_dashboard(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let summary = state.service.get_dashboard_summary().await;
    let expenses = state.service.get_expenses().await;

    let (summary, mut expenses) = match (summary, expenses) {
        (Ok(summary), Ok(expenses)) => (summary, expenses),
        (Err(e), _) | (_, Err(e)) => {
            state.report(&e, "dashboard");
            let inner = format!(
                "<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2></div>{}",
                error_fragment("Error loading dashboard data")
            );
            return axum::response::Html(page_response(&headers, "Dashboard", "/", &inner));
        }
    };
    expenses.sort_by(|a, b| b.date.cmp(&a.date));

    let recent: String = expenses
        .iter()
        .take(RECENT_EXPENSES)
        .map(|e| recent_expense_row(&state, e))
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Dashboard</h2><p class='text-gray-500'>Welcome back! Here's your business overview.</p></div>
        <div class='grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-4 mb-6'>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Cash Flow</p><p class='text-2xl font-bold text-green-600'>{}</p></div>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Revenue</p><p class='text-2xl font-bold'>{}</p></div>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Expenses</p><p class='text-2xl font-bold text-red-600'>{}</p></div>
            <div class='bg-white p-4 rounded-lg border'><p class='text-sm text-gray-500'>Runway</p><p class='text-2xl font-bold'>{} days</p><p class='text-xs text-gray-400'>At current burn rate</p></div>
        </div>
        <div class='grid grid-cols-1 lg:grid-cols-2 gap-6'>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold'>Recent Expenses</h3>
                <p class='text-sm text-gray-500 mb-4'>Your latest business expenses</p>
                <div class='space-y-3'>{}</div>
                <a href='/expenses' class='block mt-4 text-center px-4 py-2 border rounded-lg hover:bg-gray-50'>View All Expenses</a>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold'>Quick Actions</h3>
                <p class='text-sm text-gray-500 mb-4'>Common tasks to manage your finances</p>
                <div class='space-y-3'>
                    <a href='/expenses/add' class='block px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Add New Expense</a>
                    <a href='/forecast' class='block px-4 py-2 border rounded-lg hover:bg-gray-50'>View Forecast</a>
                    <a href='/expenses' class='block px-4 py-2 border rounded-lg hover:bg-gray-50'>Review Expenses</a>
                </div>
            </div>
        </div>"#,
        state.money(summary.cash_flow),
        state.money(summary.revenue),
        state.money(summary.expenses),
        summary.runway,
        recent
    );

    axum::response::Html(page_response(&headers, "Dashboard", "/", &inner_content))
}

fn recent_expense_row(state: &AppState, expense: &Expense) -> String {
    format!(
        "<div class='flex items-center justify-between'><div><p class='font-medium'>{}</p><p class='text-sm text-gray-500'>{}</p></div><p class='font-medium text-red-600'>-{}</p></div>",
        escape_html(&expense.description),
        expense.date,
        state.money(expense.amount)
    )
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;

    #[tokio::test]
    async fn test_dashboard_cards() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        for path in ["/", "/dashboard"] {
            let body = body_string(send(&state, htmx_get(path)).await).await;
            assert!(body.contains("$15,420.00"));
            assert!(body.contains("$45,200.00"));
            assert!(body.contains("90 days"));
            assert!(body.contains("Office supplies"));
            // only the three newest
            assert!(!body.contains("Flowers for shop"));
        }
    }
}
