//! Expense routes - List, inline edit, delete and natural-language entry

pub mod api;
pub mod page;

pub use api::{
    api_delete_expense, api_expenses, api_parse_expense, api_update_expense, htmx_expense_delete,
    htmx_expense_edit_form, htmx_expense_row, htmx_expense_update, htmx_expenses_list,
    htmx_parse_expense,
};
pub use page::{page_add_expense, page_expenses};
