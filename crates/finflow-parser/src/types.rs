//! Extracted expense fields

use serde::{Deserialize, Serialize};

/// Fallback category when no rule matches
pub const DEFAULT_CATEGORY: &str = "General";

/// Fallback payment method when no rule matches
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

/// Fallback description when nothing is left after stripping
pub const DEFAULT_DESCRIPTION: &str = "Expense";

/// Fields derived from a free-text expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedExpense {
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub payment_method: String,
}

/// Keyword group mapped to a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub keywords: &'static [&'static str],
    pub category: &'static str,
}

/// Keyword group mapped to a payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRule {
    pub keywords: &'static [&'static str],
    pub method: &'static str,
}

/// Shared keyword test for both rule kinds; `lowered` must already be lowercase
pub(crate) fn any_keyword(keywords: &[&str], lowered: &str) -> bool {
    keywords.iter().any(|k| lowered.contains(k))
}

impl CategoryRule {
    pub fn matches(&self, lowered: &str) -> bool {
        any_keyword(self.keywords, lowered)
    }
}

impl PaymentRule {
    pub fn matches(&self, lowered: &str) -> bool {
        any_keyword(self.keywords, lowered)
    }
}
