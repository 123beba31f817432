//! Dashboard routes - Summary cards and recent expenses

pub mod api;
pub mod page;

pub use api::api_dashboard;
pub use page::page_dashboard;

/// Number of expenses listed under "Recent Expenses"
pub const RECENT_EXPENSES: usize = 3;
