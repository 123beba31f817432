//! Rule-table expense field extractor
//!
//! Derives amount, category, payment method and a cleaned description from
//! text like `"Bought office supplies for $75 with card"`. Rules are tried in
//! table order and the first match wins, so the tables below are the policy.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{
    CategoryRule, ExtractedExpense, PaymentRule, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION,
    DEFAULT_PAYMENT_METHOD,
};

/// Category rules, in priority order
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule { keywords: &["office", "supplies"], category: "Office & Admin" },
    CategoryRule { keywords: &["gas", "fuel"], category: "Transportation" },
    CategoryRule { keywords: &["food", "lunch"], category: "Meals" },
    CategoryRule { keywords: &["electric", "utility"], category: "Utilities" },
    CategoryRule { keywords: &["flower", "inventory"], category: "Inventory" },
];

/// Payment method rules, in priority order
pub const PAYMENT_RULES: &[PaymentRule] = &[
    PaymentRule { keywords: &["card", "credit"], method: "Credit Card" },
    PaymentRule { keywords: &["debit"], method: "Debit Card" },
    PaymentRule { keywords: &["check"], method: "Check" },
];

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?(\d+(?:\.\d{2})?)").expect("amount pattern is valid")
});

static METHOD_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)with (card|credit|debit|cash|check)").expect("method phrase pattern is valid")
});

/// First amount in the text, or 0 when there is none
pub fn extract_amount(text: &str) -> f64 {
    AMOUNT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Category from the first matching rule in `rules`
pub fn classify_category(text: &str, rules: &[CategoryRule]) -> String {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// Payment method from the first matching rule in `rules`
pub fn classify_payment(text: &str, rules: &[PaymentRule]) -> String {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.method)
        .unwrap_or(DEFAULT_PAYMENT_METHOD)
        .to_string()
}

/// Text with the first amount and the first "with <method>" phrase removed
pub fn clean_description(text: &str) -> String {
    let without_amount = AMOUNT_RE.replace(text, "");
    let without_method = METHOD_PHRASE_RE.replace(&without_amount, "");
    let trimmed = without_method.trim();
    if trimmed.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Extract every field using the built-in rule tables. Never fails.
pub fn extract(text: &str) -> ExtractedExpense {
    extract_with_rules(text, CATEGORY_RULES, PAYMENT_RULES)
}

/// Extract with caller-supplied rule tables
pub fn extract_with_rules(
    text: &str,
    category_rules: &[CategoryRule],
    payment_rules: &[PaymentRule],
) -> ExtractedExpense {
    ExtractedExpense {
        amount: extract_amount(text),
        description: clean_description(text),
        category: classify_category(text, category_rules),
        payment_method: classify_payment(text, payment_rules),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_supplies_with_card() {
        let result = extract("Bought office supplies for $75 with card");
        assert_eq!(result.amount, 75.0);
        assert_eq!(result.category, "Office & Admin");
        assert_eq!(result.payment_method, "Credit Card");
        assert_eq!(result.description, "Bought office supplies for");
    }

    #[test]
    fn test_gas_paid_in_cash_uses_default_method() {
        let result = extract("Gas for delivery truck $45 cash");
        assert_eq!(result.amount, 45.0);
        assert_eq!(result.category, "Transportation");
        assert_eq!(result.payment_method, "Cash");
        assert_eq!(result.description, "Gas for delivery truck  cash");
    }

    #[test]
    fn test_amount_forms() {
        assert_eq!(extract_amount("Lunch $12.50"), 12.5);
        assert_eq!(extract_amount("paid 200 for flowers"), 200.0);
        assert_eq!(extract_amount("no digits here"), 0.0);
        // Single decimal digit is not a cents fraction
        assert_eq!(extract_amount("$7.5 coffee"), 7.0);
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        // "supplies" beats "gas"; "card" beats "debit"
        let result = extract("gas station supplies, debit card");
        assert_eq!(result.category, "Office & Admin");
        assert_eq!(result.payment_method, "Credit Card");

        let result = extract("credit union gas $30");
        assert_eq!(result.category, "Transportation");
        assert_eq!(result.payment_method, "Credit Card");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let result = extract("ELECTRIC bill paid by CHECK");
        assert_eq!(result.category, "Utilities");
        assert_eq!(result.payment_method, "Check");
    }

    #[test]
    fn test_defaults() {
        let result = extract("$20");
        assert_eq!(result.description, "Expense");
        assert_eq!(result.category, "General");
        assert_eq!(result.payment_method, "Cash");
    }

    #[test]
    fn test_only_first_amount_and_phrase_removed() {
        let result = extract("Flowers 30 and vase 15 with debit");
        assert_eq!(result.amount, 30.0);
        assert_eq!(result.description, "Flowers  and vase 15");
        assert_eq!(result.category, "Inventory");
        assert_eq!(result.payment_method, "Debit Card");
    }

    #[test]
    fn test_custom_rule_tables() {
        let categories = [CategoryRule { keywords: &["ads"], category: "Marketing" }];
        let result = extract_with_rules("Facebook ads $99", &categories, &[]);
        assert_eq!(result.category, "Marketing");
        assert_eq!(result.payment_method, "Cash");
    }
}
