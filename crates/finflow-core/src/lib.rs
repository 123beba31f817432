//! Finance domain core
//!
//! Data model, the in-memory finance service and the pure state helpers the
//! pages are built from: aging, row selection, line items, the create wizard,
//! forecasts and splitter layout.

pub mod aging;
pub mod clock;
pub mod draft;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod forecast;
pub mod layout;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod selection;
pub mod service;
pub mod types;

pub use clock::Clock;
pub use draft::FinanceDraft;
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger,
    ErrorSeverity,
};
pub use forecast::ForecastGenerator;
pub use layout::{PositionStore, SplitterState};
pub use ledger::{FieldErrors, LineItemUpdate, LineItems};
pub use models::{
    AgingBucket, ChartPoint, DashboardSummary, Expense, ExpensePatch, FinanceFlowData,
    FinanceInsights, FinanceRecord, ForecastData, LineItem, MarkPaidResult, NewFinanceDocument,
    ParseExpenseResponse, Party, Payable, Receivable,
};
pub use reports::ExpenseStats;
pub use selection::{SelectionAction, SelectionState};
pub use service::{FinanceService, MockFinanceService, ServiceRef};
pub use types::{
    AgingConvention, AgingRange, BulkAction, DocumentKind, FinanceBasis, FinanceStatus, TaxCode,
    Trend,
};
