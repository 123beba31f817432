//! Finance data service
//!
//! [`FinanceService`] is the narrow boundary the web layer talks to.
//! [`MockFinanceService`] keeps everything in memory, seeded from fixtures,
//! and sleeps a configurable latency before each call to behave like a
//! remote backend.

use async_trait::async_trait;
use chrono::{Duration as DateDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

use finflow_config::Config;
use finflow_parser::{ParserRef, RuleBasedParser};

use crate::clock::Clock;
use crate::draft::{is_known_terms, terms_days};
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::export::records_to_csv;
use crate::fixtures;
use crate::ledger::{summarize, LineItems};
use crate::forecast::{ForecastGenerator, METRICS};
use crate::models::{
    DashboardSummary, Expense, ExpensePatch, FinanceFlowData, FinanceRecord, ForecastData,
    MarkPaidResult, NewFinanceDocument, ParseExpenseResponse, Party, Payable, Receivable,
};
use crate::types::{DocumentKind, FinanceStatus};

pub const PARSE_SUCCESS_MESSAGE: &str = "Expense added successfully!";
pub const PARSE_FAILURE_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// Service reference type
pub type ServiceRef = Arc<dyn FinanceService>;

#[async_trait]
pub trait FinanceService: Send + Sync {
    async fn get_dashboard_summary(&self) -> CoreResult<DashboardSummary>;

    async fn get_expenses(&self) -> CoreResult<Vec<Expense>>;

    /// Extract and store an expense from free text
    async fn parse_expense(&self, text: &str) -> CoreResult<ParseExpenseResponse>;

    async fn update_expense(&self, id: &str, patch: ExpensePatch) -> CoreResult<Expense>;

    async fn delete_expense(&self, id: &str) -> CoreResult<()>;

    async fn get_forecast(&self, metric: &str, period: u32) -> CoreResult<ForecastData>;

    /// One forecast per known metric
    async fn get_comprehensive_forecast(&self, period: u32) -> CoreResult<Vec<ForecastData>>;

    async fn get_finance_flow(&self) -> CoreResult<FinanceFlowData>;

    /// Vendors for payables, customers for receivables
    async fn parties(&self, kind: DocumentKind) -> CoreResult<Vec<Party>>;

    /// Store a submitted bill or invoice; returns its id
    async fn create_document(&self, doc: NewFinanceDocument) -> CoreResult<String>;

    async fn mark_paid(&self, kind: DocumentKind, ids: &[String]) -> CoreResult<MarkPaidResult>;

    /// CSV of the given ids; an empty id list exports every row
    async fn export_csv(&self, kind: DocumentKind, ids: &[String]) -> CoreResult<Vec<u8>>;

    /// The service's notion of today
    fn today(&self) -> NaiveDate;

    /// Name of the expense extraction backend
    fn parser_name(&self) -> &'static str;
}

#[derive(Debug)]
struct MockData {
    expenses: Vec<Expense>,
    payables: Vec<Payable>,
    receivables: Vec<Receivable>,
    vendors: Vec<Party>,
    customers: Vec<Party>,
    next_expense_id: u64,
}

impl MockData {
    fn seeded(today: NaiveDate) -> Self {
        let expenses = fixtures::expenses();
        let next_expense_id = expenses
            .iter()
            .filter_map(|e| e.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            expenses,
            payables: fixtures::payables(today),
            receivables: fixtures::receivables(today),
            vendors: fixtures::vendors(),
            customers: fixtures::customers(),
            next_expense_id,
        }
    }
}

/// In-memory stand-in for a finance backend
pub struct MockFinanceService {
    parser: ParserRef,
    latency: Duration,
    forecaster: ForecastGenerator,
    clock: Clock,
    rng: Mutex<StdRng>,
    error_logger: Arc<dyn ErrorLogger>,
    data: RwLock<MockData>,
}

impl MockFinanceService {
    pub fn new(parser: ParserRef) -> Self {
        let clock = Clock::System;
        Self {
            parser,
            latency: Duration::ZERO,
            forecaster: ForecastGenerator::default(),
            clock,
            rng: Mutex::new(StdRng::from_entropy()),
            error_logger: Arc::new(DefaultErrorLogger),
            data: RwLock::new(MockData::seeded(clock.today())),
        }
    }

    /// Service configured from the `service` and `forecast` sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(RuleBasedParser))
            .with_latency(Duration::from_millis(config.service.latency_ms))
            .with_noise(config.forecast.noise)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.forecaster = ForecastGenerator::new(noise);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Pin the date; fixtures are re-seeded relative to it
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.data = RwLock::new(MockData::seeded(clock.today()));
        self
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.error_logger = logger;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn forecast_with_rng(&self, metric: &str, period: u32) -> CoreResult<ForecastData> {
        let mut rng = self.rng.lock().map_err(|_| CoreError::InternalError {
            message: "forecast RNG lock poisoned".to_string(),
        })?;
        self.forecaster.generate(metric, period, self.clock.today(), &mut *rng)
    }
}

fn mark_records<T: FinanceRecord>(records: &mut [T], ids: &[String]) -> MarkPaidResult {
    let mut result = MarkPaidResult::default();
    for id in ids {
        match records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.set_status(FinanceStatus::Paid);
                result.updated.push(id.clone());
            }
            None => result.unknown.push(id.clone()),
        }
    }
    result
}

fn pick_records<'a, T: FinanceRecord>(records: &'a [T], ids: &[String]) -> Vec<&'a T> {
    if ids.is_empty() {
        return records.iter().collect();
    }
    ids.iter()
        .filter_map(|id| records.iter().find(|r| r.id() == id))
        .collect()
}

fn outstanding<T: FinanceRecord>(records: &[T]) -> f64 {
    records
        .iter()
        .filter(|r| r.status() != FinanceStatus::Paid)
        .map(|r| r.amount())
        .sum()
}

#[async_trait]
impl FinanceService for MockFinanceService {
    async fn get_dashboard_summary(&self) -> CoreResult<DashboardSummary> {
        self.simulate_latency().await;
        log::debug!("Serving dashboard summary");
        Ok(fixtures::dashboard_summary())
    }

    async fn get_expenses(&self) -> CoreResult<Vec<Expense>> {
        self.simulate_latency().await;
        let data = self.data.read().await;
        log::debug!("Serving {} expenses", data.expenses.len());
        Ok(data.expenses.clone())
    }

    async fn parse_expense(&self, text: &str) -> CoreResult<ParseExpenseResponse> {
        if text.trim().is_empty() {
            return Err(CoreError::ValidationError {
                message: "Please describe the expense".to_string(),
            });
        }
        self.simulate_latency().await;

        let extracted = match self.parser.parse(text).await {
            Ok(extracted) => extracted,
            Err(e) => {
                let error = CoreError::from(e);
                let context = ErrorContext::new("parse_expense")
                    .with_data("parser", serde_json::json!(self.parser.name()));
                self.error_logger.log_error(&error, &context);
                return Ok(ParseExpenseResponse {
                    success: false,
                    message: PARSE_FAILURE_MESSAGE.to_string(),
                    expense: None,
                });
            }
        };

        let mut data = self.data.write().await;
        let expense = Expense {
            id: data.next_expense_id.to_string(),
            date: self.clock.today(),
            description: extracted.description,
            category: extracted.category,
            payment_method: extracted.payment_method,
            amount: extracted.amount,
        };
        data.next_expense_id += 1;
        data.expenses.insert(0, expense.clone());
        log::info!(
            "Added expense {} ({} {:.2})",
            expense.id,
            expense.category,
            expense.amount
        );

        Ok(ParseExpenseResponse {
            success: true,
            message: PARSE_SUCCESS_MESSAGE.to_string(),
            expense: Some(expense),
        })
    }

    async fn update_expense(&self, id: &str, patch: ExpensePatch) -> CoreResult<Expense> {
        if matches!(patch.amount, Some(a) if !(a >= 0.0)) {
            return Err(CoreError::ValidationError {
                message: "Amount must not be negative".to_string(),
            });
        }
        self.simulate_latency().await;
        let mut data = self.data.write().await;
        let expense = data
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::ExpenseNotFound { id: id.to_string() })?;
        expense.apply(&patch);
        log::info!("Updated expense {}", id);
        Ok(expense.clone())
    }

    async fn delete_expense(&self, id: &str) -> CoreResult<()> {
        self.simulate_latency().await;
        let mut data = self.data.write().await;
        let before = data.expenses.len();
        data.expenses.retain(|e| e.id != id);
        if data.expenses.len() == before {
            return Err(CoreError::ExpenseNotFound { id: id.to_string() });
        }
        log::info!("Deleted expense {}", id);
        Ok(())
    }

    async fn get_forecast(&self, metric: &str, period: u32) -> CoreResult<ForecastData> {
        self.simulate_latency().await;
        log::debug!("Generating {} forecast over {} days", metric, period);
        self.forecast_with_rng(metric, period)
    }

    async fn get_comprehensive_forecast(&self, period: u32) -> CoreResult<Vec<ForecastData>> {
        self.simulate_latency().await;
        METRICS
            .iter()
            .map(|(metric, _)| self.forecast_with_rng(metric, period))
            .collect()
    }

    async fn get_finance_flow(&self) -> CoreResult<FinanceFlowData> {
        self.simulate_latency().await;
        let data = self.data.read().await;
        Ok(FinanceFlowData {
            total_payables: outstanding(&data.payables),
            total_receivables: outstanding(&data.receivables),
            payables: data.payables.clone(),
            receivables: data.receivables.clone(),
            payable_aging: fixtures::payable_aging(),
            receivable_aging: fixtures::receivable_aging(),
            insights: fixtures::insights(),
        })
    }

    async fn parties(&self, kind: DocumentKind) -> CoreResult<Vec<Party>> {
        self.simulate_latency().await;
        let data = self.data.read().await;
        Ok(match kind {
            DocumentKind::Payable => data.vendors.clone(),
            DocumentKind::Receivable => data.customers.clone(),
        })
    }

    async fn create_document(&self, mut doc: NewFinanceDocument) -> CoreResult<String> {
        let lines = LineItems::from_lines(std::mem::take(&mut doc.items));
        let errors = lines.validate();
        if !errors.is_empty() {
            return Err(CoreError::ValidationError {
                message: summarize(&errors),
            });
        }
        doc.items = lines.into_items();
        if !is_known_terms(&doc.terms) {
            return Err(CoreError::ValidationError {
                message: format!("Unknown payment terms: {}", doc.terms),
            });
        }
        let due_date = doc
            .date
            .checked_add_signed(DateDuration::days(terms_days(&doc.terms)))
            .ok_or_else(|| CoreError::ValidationError {
                message: "Due date is out of range".to_string(),
            })?;
        self.simulate_latency().await;

        let mut data = self.data.write().await;
        let prefix = if doc.is_draft { "DRAFT" } else { doc.kind.number_prefix() };
        let invoice_number = finflow_utils::generate_document_number(prefix);
        let id = finflow_utils::generate_id();
        let amount = doc.total();

        match doc.kind {
            DocumentKind::Payable => {
                let vendor = data
                    .vendors
                    .iter()
                    .find(|p| p.id == doc.party_id)
                    .cloned()
                    .ok_or_else(|| CoreError::PartyNotFound { id: doc.party_id.clone() })?;
                data.payables.push(Payable {
                    id: id.clone(),
                    invoice_number: invoice_number.clone(),
                    vendor,
                    amount,
                    due_date: doc.date,
                    status: FinanceStatus::Unpaid,
                    items: Some(doc.items),
                });
            }
            DocumentKind::Receivable => {
                let customer = data
                    .customers
                    .iter()
                    .find(|p| p.id == doc.party_id)
                    .cloned()
                    .ok_or_else(|| CoreError::PartyNotFound { id: doc.party_id.clone() })?;
                data.receivables.push(Receivable {
                    id: id.clone(),
                    invoice_number: invoice_number.clone(),
                    customer,
                    amount,
                    issue_date: doc.date,
                    due_date,
                    status: FinanceStatus::Unpaid,
                    items: Some(doc.items),
                });
            }
        }

        log::info!("Created {} {} for {:.2}", doc.kind.document_label(), invoice_number, amount);
        Ok(id)
    }

    async fn mark_paid(&self, kind: DocumentKind, ids: &[String]) -> CoreResult<MarkPaidResult> {
        self.simulate_latency().await;
        let mut data = self.data.write().await;
        let result = match kind {
            DocumentKind::Payable => mark_records(&mut data.payables, ids),
            DocumentKind::Receivable => mark_records(&mut data.receivables, ids),
        };
        log::info!(
            "Marked {} {}(s) paid, {} unknown id(s)",
            result.updated.len(),
            kind.document_label(),
            result.unknown.len()
        );
        if !result.unknown.is_empty() {
            self.error_logger.log_warning(
                &format!("Unknown ids: {}", result.unknown.join(", ")),
                &ErrorContext::new("mark_paid"),
            );
        }
        Ok(result)
    }

    async fn export_csv(&self, kind: DocumentKind, ids: &[String]) -> CoreResult<Vec<u8>> {
        self.simulate_latency().await;
        let data = self.data.read().await;
        let bytes = match kind {
            DocumentKind::Payable => records_to_csv(&pick_records(&data.payables, ids))?,
            DocumentKind::Receivable => records_to_csv(&pick_records(&data.receivables, ids))?,
        };
        log::info!("Exported {} {}s ({} bytes)", kind, kind.document_label(), bytes.len());
        Ok(bytes)
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn parser_name(&self) -> &'static str {
        self.parser.name()
    }
}
