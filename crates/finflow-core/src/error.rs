//! Error types for finflow-core
//!
//! Error codes, severities and suggestion-bearing details for the finance
//! service and the state helpers around it.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Expense not found
    ExpenseNotFound,
    /// Vendor or customer not found
    PartyNotFound,
    /// Extraction backend failed
    ParseError,
    /// Validation error
    ValidationError,
    /// CSV export failed
    ExportError,
    /// IO error
    IoError,
    /// Invalid data format
    InvalidFormat,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ExpenseNotFound => write!(f, "EXPENSE_NOT_FOUND"),
            ErrorCode::PartyNotFound => write!(f, "PARTY_NOT_FOUND"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::ExportError => write!(f, "EXPORT_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for finflow-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Expense not found: {id}")]
    ExpenseNotFound { id: String },

    #[error("Party not found: {id}")]
    PartyNotFound { id: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Export failed: {message}")]
    ExportError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ExpenseNotFound { .. } => ErrorCode::ExpenseNotFound,
            CoreError::PartyNotFound { .. } => ErrorCode::PartyNotFound,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::ExportError { .. } => ErrorCode::ExportError,
            CoreError::IoError(_) => ErrorCode::IoError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ExpenseNotFound { .. }
            | CoreError::PartyNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::ParseError { .. }
            | CoreError::ExportError { .. }
            | CoreError::IoError(_)
            | CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the caller supplied something wrong, as opposed to a server fault
    pub fn is_client_error(&self) -> bool {
        matches!(self.severity(), ErrorSeverity::Info | ErrorSeverity::Warning)
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ExpenseNotFound { .. } => details
                .with_suggestion("The expense may already have been deleted.".to_string())
                .with_suggestion("Use the /api/expenses endpoint to list all expenses.".to_string()),
            CoreError::PartyNotFound { .. } => details
                .with_suggestion("Pick a vendor or customer from the search list.".to_string()),
            CoreError::ParseError { message } => details
                .with_detail(serde_json::json!({ "parse_message": message }))
                .with_suggestion("Try describing the expense with an amount, e.g. \"Lunch $12.50\".".to_string()),
            CoreError::ValidationError { message } => details
                .with_detail(serde_json::json!({ "validation_message": message }))
                .with_suggestion("Review the validation message for specific requirements.".to_string()),
            CoreError::InvalidFormat { .. } => details
                .with_suggestion("Delete the stored layout file to reset saved positions.".to_string()),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<finflow_parser::ParseError> for CoreError {
    fn from(error: finflow_parser::ParseError) -> Self {
        CoreError::ParseError { message: error.to_string() }
    }
}

impl From<csv::Error> for CoreError {
    fn from(error: csv::Error) -> Self {
        CoreError::ExportError { message: error.to_string() }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidFormat { message: error.to_string() }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            request_id: None,
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "finflow::error",
            "ERROR [{}] {} - Operation: {} - Data: {} - Request: {:?}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data,
            context.request_id
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "finflow::error",
            "WARNING: {} - Operation: {} - Request: {:?}",
            message,
            context.operation,
            context.request_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ExpenseNotFound.to_string(), "EXPENSE_NOT_FOUND");
        assert_eq!(ErrorCode::PartyNotFound.to_string(), "PARTY_NOT_FOUND");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_core_error_severity() {
        let error = CoreError::ExpenseNotFound { id: "9".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Info);
        assert!(error.is_client_error());

        let error = CoreError::InternalError { message: "lock poisoned".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_error_details_expense_not_found() {
        let error = CoreError::ExpenseNotFound { id: "42".to_string() };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::ExpenseNotFound);
        assert!(details.message.contains("42"));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_parse_error_conversion() {
        let error: CoreError = finflow_parser::ParseError::BackendError {
            message: "timeout".to_string(),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::ParseError);
        assert!(error.to_details().details.is_some());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("delete_expense")
            .with_request_id("req-1".to_string())
            .with_data("id", serde_json::json!("3"));
        assert_eq!(context.operation, "delete_expense");
        assert_eq!(context.data["id"], "3");
    }
}
