//! Expense text extraction
//!
//! Turns a free-text entry into structured expense fields with ordered
//! keyword rule tables and one amount regex.

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod extractor;
pub mod types;

pub use error::ParseError;
pub use extractor::{extract, extract_with_rules, CATEGORY_RULES, PAYMENT_RULES};
pub use types::{
    CategoryRule, ExtractedExpense, PaymentRule, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION,
    DEFAULT_PAYMENT_METHOD,
};

// ==================== Parser Trait ====================

/// Parser reference type
pub type ParserRef = Arc<dyn ExpenseParser>;

/// Anything that can turn expense text into fields
#[async_trait]
pub trait ExpenseParser: Send + Sync {
    /// Extract fields from one entry
    async fn parse(&self, text: &str) -> Result<ExtractedExpense, ParseError>;

    /// Short name used in logs and on the settings page
    fn name(&self) -> &'static str;
}

/// Default parser backed by the built-in rule tables
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedParser;

#[async_trait]
impl ExpenseParser for RuleBasedParser {
    async fn parse(&self, text: &str) -> Result<ExtractedExpense, ParseError> {
        let extracted = extract(text);
        log::debug!(
            "Extracted amount={} category={} method={}",
            extracted.amount,
            extracted.category,
            extracted.payment_method
        );
        Ok(extracted)
    }

    fn name(&self) -> &'static str {
        "rule-table"
    }
}
