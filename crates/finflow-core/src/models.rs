//! Core data models for the finance tracker

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{AgingRange, DocumentKind, FinanceStatus, TaxCode, Trend};

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Free text; extracted expenses use the rule-table vocabulary
    pub category: String,
    pub payment_method: String,
    pub amount: f64,
}

impl Expense {
    /// Case-insensitive match on description or category
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.description.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        if let Some(ref payment_method) = patch.payment_method {
            self.payment_method = payment_method.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
    }
}

/// Partial expense update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self == &ExpensePatch::default()
    }
}

/// Vendor or customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Party {
    /// Case-insensitive match on name or email
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

/// One line on a bill or invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub rate: f64,
    pub tax_code: TaxCode,
    /// Always `quantity * rate`
    pub amount: f64,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            rate: 0.0,
            tax_code: TaxCode::default(),
            amount: 0.0,
        }
    }
}

impl LineItem {
    pub fn new(description: &str, quantity: f64, rate: f64, tax_code: TaxCode) -> Self {
        Self {
            description: description.to_string(),
            quantity,
            rate,
            tax_code,
            amount: quantity * rate,
        }
    }

    pub fn tax(&self) -> f64 {
        self.amount * self.tax_code.rate()
    }
}

/// A bill owed to a vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payable {
    pub id: String,
    pub invoice_number: String,
    pub vendor: Party,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: FinanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

/// An invoice owed by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receivable {
    pub id: String,
    pub invoice_number: String,
    pub customer: Party,
    pub amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: FinanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<LineItem>>,
}

/// Common read access to payables and receivables, so tables, aging filters
/// and export work on either
pub trait FinanceRecord {
    fn id(&self) -> &str;
    fn invoice_number(&self) -> &str;
    fn party(&self) -> &Party;
    fn amount(&self) -> f64;
    fn due_date(&self) -> NaiveDate;
    fn status(&self) -> FinanceStatus;
    fn set_status(&mut self, status: FinanceStatus);
    /// Date shown in the table and export: due date for bills, issue date for invoices
    fn display_date(&self) -> NaiveDate;
}

impl FinanceRecord for Payable {
    fn id(&self) -> &str {
        &self.id
    }
    fn invoice_number(&self) -> &str {
        &self.invoice_number
    }
    fn party(&self) -> &Party {
        &self.vendor
    }
    fn amount(&self) -> f64 {
        self.amount
    }
    fn due_date(&self) -> NaiveDate {
        self.due_date
    }
    fn status(&self) -> FinanceStatus {
        self.status
    }
    fn set_status(&mut self, status: FinanceStatus) {
        self.status = status;
    }
    fn display_date(&self) -> NaiveDate {
        self.due_date
    }
}

impl FinanceRecord for Receivable {
    fn id(&self) -> &str {
        &self.id
    }
    fn invoice_number(&self) -> &str {
        &self.invoice_number
    }
    fn party(&self) -> &Party {
        &self.customer
    }
    fn amount(&self) -> f64 {
        self.amount
    }
    fn due_date(&self) -> NaiveDate {
        self.due_date
    }
    fn status(&self) -> FinanceStatus {
        self.status
    }
    fn set_status(&mut self, status: FinanceStatus) {
        self.status = status;
    }
    fn display_date(&self) -> NaiveDate {
        self.issue_date
    }
}

/// Precomputed aging aggregate for the aging chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingBucket {
    pub label: String,
    pub amount: f64,
    pub count: u32,
    pub percentage: f64,
    pub range: AgingRange,
}

impl AgingBucket {
    pub fn new(range: AgingRange, amount: f64, count: u32, percentage: f64) -> Self {
        Self {
            label: range.label(),
            amount,
            count,
            percentage,
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueVendor {
    pub vendor: Party,
    pub amount: f64,
    pub days_past_due: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomer {
    pub customer: Party,
    pub amount: f64,
}

/// Sidebar figures for the finance flow page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceInsights {
    /// Average days to pay a bill
    pub avg_payment_time: u32,
    /// Days sales outstanding
    pub dso: u32,
    pub top_overdue_vendors: Vec<OverdueVendor>,
    pub top_customers: Vec<TopCustomer>,
}

/// Everything the finance flow page shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceFlowData {
    pub total_payables: f64,
    pub total_receivables: f64,
    pub payables: Vec<Payable>,
    pub receivables: Vec<Receivable>,
    pub payable_aging: Vec<AgingBucket>,
    pub receivable_aging: Vec<AgingBucket>,
    pub insights: FinanceInsights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub cash_flow: f64,
    pub revenue: f64,
    pub expenses: f64,
    /// Days of runway at the current burn rate
    pub runway: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastData {
    pub metric: String,
    pub period: u32,
    pub current_value: f64,
    pub projected_value: f64,
    pub trend: Trend,
    pub confidence: u32,
    pub insights: Vec<String>,
    pub chart_data: Vec<ChartPoint>,
}

/// Outcome of a natural-language expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseExpenseResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense: Option<Expense>,
}

/// A bill or invoice submitted from the create wizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinanceDocument {
    pub kind: DocumentKind,
    pub party_id: String,
    pub items: Vec<LineItem>,
    pub terms: String,
    /// Due date for bills, issue date for invoices
    pub date: NaiveDate,
    pub is_draft: bool,
}

impl NewFinanceDocument {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

/// Outcome of a bulk mark-paid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkPaidResult {
    pub updated: Vec<String>,
    /// Ids that matched no document
    pub unknown: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense() -> Expense {
        Expense {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: "Office supplies".to_string(),
            category: "Office & Admin".to_string(),
            payment_method: "Credit Card".to_string(),
            amount: 150.0,
        }
    }

    #[test]
    fn test_expense_search() {
        let e = expense();
        assert!(e.matches_search("SUPPLIES"));
        assert!(e.matches_search("admin"));
        assert!(e.matches_search("  "));
        assert!(!e.matches_search("fuel"));
    }

    #[test]
    fn test_expense_patch_merges_present_fields_only() {
        let mut e = expense();
        let patch = ExpensePatch {
            amount: Some(175.5),
            category: Some("Marketing".to_string()),
            ..Default::default()
        };
        e.apply(&patch);
        assert_eq!(e.amount, 175.5);
        assert_eq!(e.category, "Marketing");
        assert_eq!(e.description, "Office supplies");
        assert!(ExpensePatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_line_item_amount_and_tax() {
        let item = LineItem::new("Consulting", 3.0, 10.0, TaxCode::Tax002);
        assert_eq!(item.amount, 30.0);
        assert!((item.tax() - 1.5).abs() < 1e-9);
        assert_eq!(LineItem::default().quantity, 1.0);
    }

    #[test]
    fn test_expense_serializes_date_as_iso() {
        let json = serde_json::to_value(expense()).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["payment_method"], "Credit Card");
    }
}
