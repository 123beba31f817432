//! Aging classification of bills and invoices
//!
//! `days_diff` is `now - due` in whole days. Under
//! [`AgingConvention::AsWritten`] the thresholds run over negative
//! differences, so upcoming due dates fill the buckets and anything already
//! past due has no bucket. [`AgingConvention::DaysPastDue`] reads the
//! difference as days overdue and buckets every date.

use chrono::NaiveDate;

use crate::models::FinanceRecord;
use crate::types::{AgingConvention, AgingRange};

/// Whole days from `due` to `now`; positive once the due date has passed
pub fn days_diff(due: NaiveDate, now: NaiveDate) -> i64 {
    now.signed_duration_since(due).num_days()
}

/// Bucket for a due date, or `None` when the convention leaves it unbucketed
pub fn classify(due: NaiveDate, now: NaiveDate, convention: AgingConvention) -> Option<AgingRange> {
    let diff = days_diff(due, now);
    match convention {
        AgingConvention::AsWritten => match diff {
            -30..=0 => Some(AgingRange::Current),
            -60..=-31 => Some(AgingRange::Days31To60),
            -90..=-61 => Some(AgingRange::Days61To90),
            d if d < -90 => Some(AgingRange::Over90),
            _ => None,
        },
        AgingConvention::DaysPastDue => Some(match diff {
            d if d <= 30 => AgingRange::Current,
            31..=60 => AgingRange::Days31To60,
            61..=90 => AgingRange::Days61To90,
            _ => AgingRange::Over90,
        }),
    }
}

/// Rows whose due date falls in `bucket`; `None` keeps every row
pub fn filter_by_bucket<'a, T: FinanceRecord>(
    items: &'a [T],
    bucket: Option<AgingRange>,
    now: NaiveDate,
    convention: AgingConvention,
) -> Vec<&'a T> {
    match bucket {
        None => items.iter().collect(),
        Some(range) => items
            .iter()
            .filter(|item| classify(item.due_date(), now, convention) == Some(range))
            .collect(),
    }
}

/// Clicking the active bucket clears the filter, any other sets it
pub fn toggle_bucket(current: Option<AgingRange>, clicked: AgingRange) -> Option<AgingRange> {
    if current == Some(clicked) {
        None
    } else {
        Some(clicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Party, Payable};
    use crate::types::FinanceStatus;
    use chrono::Duration;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn in_days(n: i64) -> NaiveDate {
        now() + Duration::days(n)
    }

    fn payable(id: &str, due: NaiveDate) -> Payable {
        Payable {
            id: id.to_string(),
            invoice_number: format!("BILL-{}", id),
            vendor: Party {
                id: "v1".to_string(),
                name: "Office Supplies Co".to_string(),
                email: "billing@officesupplies.com".to_string(),
                phone: None,
            },
            amount: 100.0,
            due_date: due,
            status: FinanceStatus::Unpaid,
            items: None,
        }
    }

    #[test]
    fn test_as_written_boundaries() {
        let c = AgingConvention::AsWritten;
        assert_eq!(classify(now(), now(), c), Some(AgingRange::Current));
        assert_eq!(classify(in_days(30), now(), c), Some(AgingRange::Current));
        assert_eq!(classify(in_days(31), now(), c), Some(AgingRange::Days31To60));
        assert_eq!(classify(in_days(60), now(), c), Some(AgingRange::Days31To60));
        assert_eq!(classify(in_days(61), now(), c), Some(AgingRange::Days61To90));
        assert_eq!(classify(in_days(90), now(), c), Some(AgingRange::Days61To90));
        assert_eq!(classify(in_days(91), now(), c), Some(AgingRange::Over90));
        assert_eq!(classify(in_days(-1), now(), c), None);
    }

    #[test]
    fn test_days_past_due_boundaries() {
        let c = AgingConvention::DaysPastDue;
        assert_eq!(classify(in_days(10), now(), c), Some(AgingRange::Current));
        assert_eq!(classify(in_days(-30), now(), c), Some(AgingRange::Current));
        assert_eq!(classify(in_days(-31), now(), c), Some(AgingRange::Days31To60));
        assert_eq!(classify(in_days(-60), now(), c), Some(AgingRange::Days31To60));
        assert_eq!(classify(in_days(-61), now(), c), Some(AgingRange::Days61To90));
        assert_eq!(classify(in_days(-91), now(), c), Some(AgingRange::Over90));
    }

    #[test]
    fn test_classify_is_idempotent() {
        for offset in [-120, -45, -1, 0, 15, 75, 200] {
            for convention in [AgingConvention::AsWritten, AgingConvention::DaysPastDue] {
                let first = classify(in_days(offset), now(), convention);
                let second = classify(in_days(offset), now(), convention);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_filter_by_bucket() {
        let rows = vec![payable("1", in_days(10)), payable("2", in_days(45)), payable("3", in_days(-5))];

        let all = filter_by_bucket(&rows, None, now(), AgingConvention::AsWritten);
        assert_eq!(all.len(), 3);

        let current = filter_by_bucket(&rows, Some(AgingRange::Current), now(), AgingConvention::AsWritten);
        let ids: Vec<&str> = current.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let current = filter_by_bucket(&rows, Some(AgingRange::Current), now(), AgingConvention::DaysPastDue);
        assert_eq!(current.len(), 3);
    }

    #[test]
    fn test_toggle_bucket() {
        let first = toggle_bucket(None, AgingRange::Over90);
        assert_eq!(first, Some(AgingRange::Over90));
        assert_eq!(toggle_bucket(first, AgingRange::Over90), None);
        assert_eq!(toggle_bucket(first, AgingRange::Current), Some(AgingRange::Current));
    }
}
