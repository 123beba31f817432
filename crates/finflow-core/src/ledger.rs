//! Editable line items for a bill or invoice

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::LineItem;
use crate::types::TaxCode;

/// Field-keyed validation messages, e.g. `rate_1 -> "Rate must be greater than 0"`
pub type FieldErrors = BTreeMap<String, String>;

/// Messages joined into one line, in key order
pub fn summarize(errors: &FieldErrors) -> String {
    errors.values().cloned().collect::<Vec<_>>().join("; ")
}

/// One field edit on a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LineItemUpdate {
    Description(String),
    Quantity(f64),
    Rate(f64),
    TaxCode(TaxCode),
}

/// Non-empty list of line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItems {
    items: Vec<LineItem>,
}

impl Default for LineItems {
    fn default() -> Self {
        Self {
            items: vec![LineItem::default()],
        }
    }
}

impl LineItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild lines received from a client; each amount is recomputed
    pub fn from_lines(lines: Vec<LineItem>) -> Self {
        Self {
            items: lines
                .into_iter()
                .map(|line| LineItem::new(&line.description, line.quantity, line.rate, line.tax_code))
                .collect(),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// No-op for the last remaining item or an index past the end
    pub fn remove_item(&mut self, index: usize) {
        if self.items.len() > 1 && index < self.items.len() {
            self.items.remove(index);
        }
    }

    /// Quantity and rate edits recompute that line's amount
    pub fn update_item(&mut self, index: usize, update: LineItemUpdate) {
        let Some(item) = self.items.get_mut(index) else {
            return;
        };
        match update {
            LineItemUpdate::Description(description) => item.description = description,
            LineItemUpdate::TaxCode(code) => item.tax_code = code,
            LineItemUpdate::Quantity(quantity) => {
                item.quantity = quantity;
                item.amount = item.quantity * item.rate;
            }
            LineItemUpdate::Rate(rate) => {
                item.rate = rate;
                item.amount = item.quantity * item.rate;
            }
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn tax_total(&self) -> f64 {
        self.items.iter().map(LineItem::tax).sum()
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.items.is_empty() {
            errors.insert("items".to_string(), "At least one line item is required".to_string());
        }
        for (index, item) in self.items.iter().enumerate() {
            if item.description.trim().is_empty() {
                errors.insert(format!("description_{}", index), "Description is required".to_string());
            }
            if !(item.quantity > 0.0 && item.quantity.is_finite()) {
                errors.insert(format!("quantity_{}", index), "Quantity must be greater than 0".to_string());
            }
            if !(item.rate > 0.0 && item.rate.is_finite()) {
                errors.insert(format!("rate_{}", index), "Rate must be greater than 0".to_string());
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_default_item() {
        let ledger = LineItems::new();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.items()[0], LineItem::default());
        assert_eq!(ledger.total(), 0.0);
    }

    #[test]
    fn test_quantity_update_recomputes_amount() {
        let mut ledger = LineItems::new();
        ledger.update_item(0, LineItemUpdate::Rate(10.0));
        ledger.update_item(0, LineItemUpdate::Quantity(3.0));
        assert_eq!(ledger.items()[0].amount, 30.0);
        assert_eq!(ledger.total(), 30.0);
    }

    #[test]
    fn test_update_touches_only_target_item() {
        let mut ledger = LineItems::new();
        ledger.add_item();
        ledger.update_item(1, LineItemUpdate::Rate(25.0));
        assert_eq!(ledger.items()[0].amount, 0.0);
        assert_eq!(ledger.items()[1].amount, 25.0);
        ledger.update_item(7, LineItemUpdate::Rate(99.0));
        assert_eq!(ledger.total(), 25.0);
    }

    #[test]
    fn test_remove_last_item_is_noop() {
        let mut ledger = LineItems::new();
        ledger.remove_item(0);
        assert_eq!(ledger.len(), 1);

        ledger.add_item();
        ledger.remove_item(5);
        assert_eq!(ledger.len(), 2);
        ledger.remove_item(1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_tax_total() {
        let mut ledger = LineItems::new();
        ledger.update_item(0, LineItemUpdate::Rate(100.0));
        ledger.add_item();
        ledger.update_item(1, LineItemUpdate::Rate(100.0));
        ledger.update_item(1, LineItemUpdate::TaxCode(TaxCode::Tax003));
        assert!((ledger.tax_total() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_keys() {
        let mut ledger = LineItems::new();
        ledger.add_item();
        ledger.update_item(0, LineItemUpdate::Description("Design work".to_string()));
        ledger.update_item(0, LineItemUpdate::Rate(50.0));
        ledger.update_item(1, LineItemUpdate::Quantity(0.0));

        let errors = ledger.validate();
        let keys: Vec<&str> = errors.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["description_1", "quantity_1", "rate_1"]);
    }

    #[test]
    fn test_from_lines_recomputes_amounts() {
        let mut forged = LineItem::new("Printer paper", 4.0, 12.5, TaxCode::Tax001);
        forged.amount = 999.0;
        let ledger = LineItems::from_lines(vec![forged]);
        assert_eq!(ledger.items()[0].amount, 50.0);
        assert_eq!(ledger.total(), 50.0);
        assert!(ledger.validate().is_empty());
    }

    #[test]
    fn test_from_lines_flags_bad_and_missing_lines() {
        let ledger = LineItems::from_lines(vec![LineItem::new("Refund", -5.0, 10.0, TaxCode::Tax001)]);
        assert_eq!(ledger.items()[0].amount, -50.0);
        assert!(ledger.validate().contains_key("quantity_0"));

        let ledger = LineItems::from_lines(vec![LineItem::new("Retainer", 1.0, f64::INFINITY, TaxCode::Tax001)]);
        assert!(ledger.validate().contains_key("rate_0"));

        let errors = LineItems::from_lines(Vec::new()).validate();
        assert_eq!(summarize(&errors), "At least one line item is required");
    }
}
