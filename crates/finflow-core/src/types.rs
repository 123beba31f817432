//! Basic enumerations for the finance domain

use serde::{Deserialize, Serialize};

pub use finflow_config::{AgingConvention, FinanceBasis};

/// Payment status of a bill or invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceStatus {
    Paid,
    Unpaid,
    Overdue,
}

impl Default for FinanceStatus {
    fn default() -> Self {
        FinanceStatus::Unpaid
    }
}

impl std::str::FromStr for FinanceStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(FinanceStatus::Paid),
            "unpaid" => Ok(FinanceStatus::Unpaid),
            "overdue" => Ok(FinanceStatus::Overdue),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl std::fmt::Display for FinanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinanceStatus::Paid => write!(f, "paid"),
            FinanceStatus::Unpaid => write!(f, "unpaid"),
            FinanceStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// Which side of the ledger a document sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A bill we owe a vendor
    Payable,
    /// An invoice a customer owes us
    Receivable,
}

impl DocumentKind {
    /// "vendor" or "customer"
    pub fn party_label(&self) -> &'static str {
        match self {
            DocumentKind::Payable => "vendor",
            DocumentKind::Receivable => "customer",
        }
    }

    /// "bill" or "invoice"
    pub fn document_label(&self) -> &'static str {
        match self {
            DocumentKind::Payable => "bill",
            DocumentKind::Receivable => "invoice",
        }
    }

    /// Prefix for generated invoice numbers
    pub fn number_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Payable => "BILL",
            DocumentKind::Receivable => "INV",
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "payable" | "payables" => Ok(DocumentKind::Payable),
            "receivable" | "receivables" => Ok(DocumentKind::Receivable),
            _ => Err(format!("Invalid document kind: {}", s)),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Payable => write!(f, "payable"),
            DocumentKind::Receivable => write!(f, "receivable"),
        }
    }
}

/// Tax code applied to a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxCode {
    /// Standard 10%
    Tax001,
    /// Reduced 5%
    Tax002,
    /// Exempt
    Tax003,
}

impl TaxCode {
    pub const ALL: [TaxCode; 3] = [TaxCode::Tax001, TaxCode::Tax002, TaxCode::Tax003];

    pub fn rate(&self) -> f64 {
        match self {
            TaxCode::Tax001 => 0.10,
            TaxCode::Tax002 => 0.05,
            TaxCode::Tax003 => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaxCode::Tax001 => "Standard (10%)",
            TaxCode::Tax002 => "Reduced (5%)",
            TaxCode::Tax003 => "Exempt (0%)",
        }
    }
}

impl Default for TaxCode {
    fn default() -> Self {
        TaxCode::Tax001
    }
}

impl std::str::FromStr for TaxCode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TAX001" => Ok(TaxCode::Tax001),
            "TAX002" => Ok(TaxCode::Tax002),
            "TAX003" => Ok(TaxCode::Tax003),
            _ => Err(format!("Invalid tax code: {}", s)),
        }
    }
}

impl std::fmt::Display for TaxCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxCode::Tax001 => write!(f, "TAX001"),
            TaxCode::Tax002 => write!(f, "TAX002"),
            TaxCode::Tax003 => write!(f, "TAX003"),
        }
    }
}

/// Aging range a due date falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgingRange {
    #[serde(rename = "0-30")]
    Current,
    #[serde(rename = "31-60")]
    Days31To60,
    #[serde(rename = "61-90")]
    Days61To90,
    #[serde(rename = "90+")]
    Over90,
}

impl AgingRange {
    pub const ALL: [AgingRange; 4] = [
        AgingRange::Current,
        AgingRange::Days31To60,
        AgingRange::Days61To90,
        AgingRange::Over90,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgingRange::Current => "0-30",
            AgingRange::Days31To60 => "31-60",
            AgingRange::Days61To90 => "61-90",
            AgingRange::Over90 => "90+",
        }
    }

    /// Display label, e.g. "31-60 days"
    pub fn label(&self) -> String {
        format!("{} days", self.as_str())
    }
}

impl std::str::FromStr for AgingRange {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0-30" => Ok(AgingRange::Current),
            "31-60" => Ok(AgingRange::Days31To60),
            "61-90" => Ok(AgingRange::Days61To90),
            "90+" => Ok(AgingRange::Over90),
            _ => Err(format!("Invalid aging range: {}", s)),
        }
    }
}

impl std::fmt::Display for AgingRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Stable => write!(f, "stable"),
        }
    }
}

/// Bulk operation over selected table rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkAction {
    #[serde(rename = "markPaid")]
    MarkPaid,
    #[serde(rename = "export")]
    Export,
}

impl BulkAction {
    /// Confirmation shown after the action completes
    pub fn confirmation(&self, kind: DocumentKind) -> &'static str {
        match (self, kind) {
            (BulkAction::MarkPaid, DocumentKind::Payable) => "Bills marked as paid",
            (BulkAction::MarkPaid, DocumentKind::Receivable) => "Invoices marked as paid",
            (BulkAction::Export, _) => "Export started",
        }
    }
}

impl std::str::FromStr for BulkAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markPaid" | "mark_paid" => Ok(BulkAction::MarkPaid),
            "export" => Ok(BulkAction::Export),
            _ => Err(format!("Invalid bulk action: {}", s)),
        }
    }
}
