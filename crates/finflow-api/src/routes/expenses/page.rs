//! Expense pages - list with inline edit, and natural-language entry

use crate::{error_fragment, page_response, AppState};
use axum::extract::Query;
use finflow_core::reports::search_expenses;
use finflow_core::{Expense, ExpenseStats, ParseExpenseResponse};
use finflow_utils::escape_html;
use std::collections::HashMap;

/// Phrases offered under the entry form
pub const EXAMPLE_PHRASES: &[&str] = &[
    "Spent $200 on flowers for the shop",
    "Paid $150 for electricity bill",
    "Bought office supplies for $75 with card",
    "Gas for delivery truck $45 cash",
    "Monthly software subscription $99",
];

pub async fn page_expenses(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
    params: Query<HashMap<String, String>>,
) -> axum::response::Html<String> {
    let query = params.get("q").map(|s| s.trim()).unwrap_or("");
    let offset = page_offset(&params);

    let inner_content = match state.service.get_expenses().await {
        Ok(expenses) => {
            let stats = ExpenseStats::from_expenses(&expenses);
            format!(
                r#"<div class='flex justify-between items-center mb-6'>
                <div><h2 class='text-2xl font-bold'>Your Expenses</h2><p class='text-gray-500'>Total: {} • {} expenses</p></div>
                <a href='/expenses/add' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ Add Expense</a>
            </div>
            <div class='bg-white rounded-xl shadow-sm p-4 mb-6'>
                <input type='search' name='q' value='{}' placeholder='Search expenses by description or category...'
                    class='w-full px-3 py-2 border rounded-lg'
                    hx-get='/expenses/list' hx-trigger='keyup changed delay:300ms, search' hx-target='#expenses-table'>
            </div>
            <div id='expenses-notice' class='mb-4'></div>
            <div class='bg-white rounded-xl shadow-sm p-6'>
                <h3 class='text-lg font-semibold'>All Expenses</h3>
                <p class='text-sm text-gray-500 mb-4'>Review, edit, or delete your business expenses</p>
                <div id='expenses-table'>{}</div>
            </div>"#,
                state.money(stats.total),
                stats.count,
                escape_html(query),
                expenses_table(&state, &expenses, query, offset)
            )
        }
        Err(e) => {
            state.report(&e, "list_expenses");
            format!(
                "<div class='mb-6'><h2 class='text-2xl font-bold'>Your Expenses</h2></div>{}",
                error_fragment("Error loading expenses")
            )
        }
    };

    axum::response::Html(page_response(&headers, "Expenses", "/expenses", &inner_content))
}

/// Offset query param, 0 when absent or malformed
pub fn page_offset(params: &HashMap<String, String>) -> usize {
    params.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0)
}

/// One page of the expense table filtered by `query`
pub fn expenses_table(state: &AppState, expenses: &[Expense], query: &str, offset: usize) -> String {
    let matching = search_expenses(expenses, query);
    if matching.is_empty() {
        let message = if query.is_empty() { "No expenses yet." } else { "No expenses match your search." };
        return format!(
            "<div class='text-center py-8'><p class='text-gray-500'>{}</p><a href='/expenses/add' class='inline-block mt-4 px-4 py-2 bg-indigo-600 text-white rounded-lg'>Add Your First Expense</a></div>",
            message
        );
    }

    let limit = state.config.pagination.records_per_page.max(1);
    let total = matching.len();
    let offset = if offset < total { offset / limit * limit } else { 0 };
    let rows: String = matching
        .iter()
        .skip(offset)
        .take(limit)
        .map(|e| expense_row(state, e))
        .collect();
    format!(
        r#"<table class='w-full text-sm'>
            <thead><tr class='border-b text-left text-gray-500'>
                <th class='py-2'>Date</th><th>Description</th><th>Category</th><th>Payment Method</th><th class='text-right'>Amount</th><th class='text-right'>Actions</th>
            </tr></thead>
            <tbody>{}</tbody>
        </table>
        {}"#,
        rows,
        pager(query, offset, limit, total)
    )
}

fn pager(query: &str, offset: usize, limit: usize, total: usize) -> String {
    let total_pages = (total + limit - 1) / limit;
    if total_pages <= 1 {
        return String::new();
    }
    let current_page = offset / limit + 1;
    let button = |label: &str, target_offset: usize, disabled: bool| {
        let vals = serde_json::json!({ "q": query, "offset": target_offset.to_string() }).to_string();
        format!(
            "<button hx-get='/expenses/list' hx-vals='{}' hx-target='#expenses-table' class='px-3 py-1 border rounded disabled:opacity-50' {}>{}</button>",
            escape_html(&vals),
            if disabled { "disabled" } else { "" },
            label
        )
    };
    format!(
        "<div class='flex justify-between items-center mt-4 text-sm text-gray-600'><span>Page {} of {} • {} expenses</span><div class='space-x-2'>{}{}</div></div>",
        current_page,
        total_pages,
        total,
        button("Previous", offset.saturating_sub(limit), current_page == 1),
        button("Next", offset + limit, current_page >= total_pages)
    )
}

pub fn expense_row(state: &AppState, expense: &Expense) -> String {
    format!(
        r#"<tr id='expense-{id}' class='border-b hover:bg-gray-50'>
            <td class='py-2'>{date}</td>
            <td class='font-medium'>{description}</td>
            <td><span class='px-2 py-0.5 rounded bg-gray-100 text-xs'>{category}</span></td>
            <td>{method}</td>
            <td class='text-right font-semibold'>{amount}</td>
            <td class='text-right space-x-2'>
                <button hx-get='/expenses/{id}/edit' hx-target='closest tr' hx-swap='outerHTML' class='text-indigo-600 hover:underline'>Edit</button>
                <button hx-delete='/expenses/{id}' hx-target='closest tr' hx-swap='outerHTML' hx-confirm='Delete this expense?' class='text-red-600 hover:underline'>Delete</button>
            </td>
        </tr>"#,
        id = escape_html(&expense.id),
        date = expense.date,
        description = escape_html(&expense.description),
        category = escape_html(&expense.category),
        method = escape_html(&expense.payment_method),
        amount = state.money(expense.amount),
    )
}

/// Inline edit form replacing a table row
pub fn expense_edit_row(expense: &Expense) -> String {
    format!(
        r#"<tr id='expense-{id}' class='border-b bg-indigo-50'>
            <td class='py-2'><input type='date' name='date' value='{date}' class='px-2 py-1 border rounded w-36'></td>
            <td><input name='description' value='{description}' class='px-2 py-1 border rounded w-full'></td>
            <td><input name='category' value='{category}' class='px-2 py-1 border rounded w-full'></td>
            <td><input name='payment_method' value='{method}' class='px-2 py-1 border rounded w-full'></td>
            <td class='text-right'><input type='number' step='0.01' min='0' name='amount' value='{amount}' class='px-2 py-1 border rounded w-24 text-right'></td>
            <td class='text-right space-x-2'>
                <button hx-put='/expenses/{id}' hx-include='closest tr' hx-target='closest tr' hx-swap='outerHTML' class='text-indigo-600 hover:underline'>Save Changes</button>
                <button hx-get='/expenses/{id}/row' hx-target='closest tr' hx-swap='outerHTML' class='text-gray-500 hover:underline'>Cancel</button>
            </td>
        </tr>"#,
        id = escape_html(&expense.id),
        date = expense.date,
        description = escape_html(&expense.description),
        category = escape_html(&expense.category),
        method = escape_html(&expense.payment_method),
        amount = expense.amount,
    )
}

pub async fn page_add_expense(
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let examples: String = EXAMPLE_PHRASES
        .iter()
        .map(|phrase| {
            format!(
                r#"<button type='button' class='text-left px-3 py-2 border rounded-lg hover:bg-gray-50 text-sm' onclick="document.getElementById('expense-input').value = this.innerText">{}</button>"#,
                escape_html(phrase)
            )
        })
        .collect();

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Add an Expense</h2><p class='text-gray-500'>Just tell us what you spent money on, in your own words.</p></div>
        <div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>What did you spend money on?</h3>
            <form hx-post='/expenses/parse' hx-target='#parse-result' hx-indicator='#parse-spinner' class='space-y-4'>
                <label for='expense-input' class='text-sm font-medium text-gray-700'>Describe your expense</label>
                <textarea id='expense-input' name='text' rows='3' class='w-full px-3 py-2 border rounded-lg'
                    placeholder='e.g., Bought office supplies for $75 with credit card'></textarea>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Add Expense</button>
                <span id='parse-spinner' class='htmx-indicator text-sm text-gray-500'>Processing...</span>
            </form>
            <div id='parse-result' class='mt-4'></div>
        </div>
        <div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>Need inspiration? Try these examples:</h3>
            <div class='grid gap-2'>{}</div>
        </div>"#,
        examples
    );

    axum::response::Html(page_response(&headers, "Add Expense", "/expenses/add", &inner_content))
}

/// Result panel under the entry form
pub fn parse_result(state: &AppState, response: &ParseExpenseResponse) -> String {
    match (&response.expense, response.success) {
        (Some(expense), true) => format!(
            r#"<div class='bg-green-50 border border-green-200 rounded-lg p-4'>
                <p class='font-medium text-green-800 mb-2'>✓ {}</p>
                <div class='grid grid-cols-2 gap-2 text-sm text-green-900'>
                    <p><strong>Amount:</strong> {}</p>
                    <p><strong>Description:</strong> {}</p>
                    <p><strong>Category:</strong> {}</p>
                    <p><strong>Payment Method:</strong> {}</p>
                </div>
            </div>"#,
            escape_html(&response.message),
            state.money(expense.amount),
            escape_html(&expense.description),
            escape_html(&expense.category),
            escape_html(&expense.payment_method)
        ),
        _ => error_fragment(&response.message),
    }
}
