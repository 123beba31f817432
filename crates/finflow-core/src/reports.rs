//! Aggregates shown on the dashboard and expenses pages

use serde::{Deserialize, Serialize};

use crate::models::Expense;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseStats {
    pub count: usize,
    pub total: f64,
    /// Largest category first
    pub by_category: Vec<CategoryTotal>,
}

impl ExpenseStats {
    pub fn from_expenses<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut stats = ExpenseStats::default();
        for expense in expenses {
            stats.count += 1;
            stats.total += expense.amount;
            match stats.by_category.iter_mut().find(|c| c.category == expense.category) {
                Some(entry) => {
                    entry.amount += expense.amount;
                    entry.count += 1;
                }
                None => stats.by_category.push(CategoryTotal {
                    category: expense.category.clone(),
                    amount: expense.amount,
                    count: 1,
                }),
            }
        }
        stats
            .by_category
            .sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
        stats
    }
}

/// Expenses whose description or category contains `term`, case-insensitively
pub fn search_expenses<'a>(expenses: &'a [Expense], term: &str) -> Vec<&'a Expense> {
    expenses.iter().filter(|e| e.matches_search(term)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_stats_over_fixtures() {
        let expenses = fixtures::expenses();
        let stats = ExpenseStats::from_expenses(&expenses);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.total, 1024.0);
        assert_eq!(stats.by_category[0].category, "Marketing");
        assert_eq!(stats.by_category.len(), 5);
    }

    #[test]
    fn test_search_expenses() {
        let expenses = fixtures::expenses();
        let found = search_expenses(&expenses, "soft");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");
        assert_eq!(search_expenses(&expenses, "").len(), 5);
        assert!(search_expenses(&expenses, "payroll").is_empty());
    }
}
