//! Route modules for the API server
//!
//! - dashboard: Summary cards and recent expenses
//! - expenses: Expense list, inline edit, delete, natural-language entry
//! - forecast: Forecast page and JSON
//! - finance_flow: Payables/receivables split view and create wizard
//! - settings: Settings page
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod dashboard;
pub mod expenses;
pub mod finance_flow;
pub mod forecast;
pub mod settings;

use finflow_core::DocumentKind;
use std::collections::HashMap;

use crate::ApiError;

/// `payables`/`receivables` path segment
pub(crate) fn parse_kind(raw: &str) -> Result<DocumentKind, ApiError> {
    raw.parse::<DocumentKind>().map_err(|_| ApiError::NotFound {
        resource: format!("finance table '{}'", raw),
    })
}

/// Form checkbox value: present and not "false"/"off"
pub(crate) fn form_flag(params: &HashMap<String, String>, key: &str) -> bool {
    params
        .get(key)
        .map(|v| !matches!(v.as_str(), "false" | "off" | "0" | ""))
        .unwrap_or(false)
}
