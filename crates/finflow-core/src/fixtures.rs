//! Seed data for the in-memory service

use chrono::{Duration, NaiveDate};

use crate::models::{
    AgingBucket, DashboardSummary, Expense, FinanceInsights, LineItem, OverdueVendor, Party,
    Payable, Receivable, TopCustomer,
};
use crate::types::{AgingRange, FinanceStatus, TaxCode};

pub fn dashboard_summary() -> DashboardSummary {
    DashboardSummary {
        cash_flow: 15_420.0,
        revenue: 45_200.0,
        expenses: 29_780.0,
        runway: 90,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn expense(id: &str, day: u32, amount: f64, description: &str, category: &str, method: &str) -> Expense {
    Expense {
        id: id.to_string(),
        date: date(2024, 1, day),
        description: description.to_string(),
        category: category.to_string(),
        payment_method: method.to_string(),
        amount,
    }
}

pub fn expenses() -> Vec<Expense> {
    vec![
        expense("1", 15, 150.0, "Office supplies", "Office & Admin", "Credit Card"),
        expense("2", 14, 500.0, "Marketing ads", "Marketing", "Credit Card"),
        expense("3", 13, 99.0, "Software subscription", "Software", "Credit Card"),
        expense("4", 12, 75.0, "Gas for delivery", "Transportation", "Cash"),
        expense("5", 11, 200.0, "Flowers for shop", "Inventory", "Debit Card"),
    ]
}

fn party(id: &str, name: &str, email: &str, phone: &str) -> Party {
    Party {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: Some(phone.to_string()),
    }
}

pub fn vendors() -> Vec<Party> {
    vec![
        party("v1", "Office Supplies Co", "billing@officesupplies.com", "555-0101"),
        party("v2", "Tech Solutions Inc", "accounts@techsolutions.com", "555-0102"),
        party("v3", "City Power & Light", "billing@citypower.com", "555-0103"),
    ]
}

pub fn customers() -> Vec<Party> {
    vec![
        party("c1", "ABC Corporation", "ap@abccorp.com", "555-0201"),
        party("c2", "XYZ Ltd", "finance@xyzltd.com", "555-0202"),
        party("c3", "Riverside Cafe", "owner@riversidecafe.com", "555-0203"),
    ]
}

/// Bills with due dates spread around `today`
pub fn payables(today: NaiveDate) -> Vec<Payable> {
    let vendors = vendors();
    let bill = |n: usize, vendor: usize, amount: f64, due_in: i64, status: FinanceStatus| Payable {
        id: format!("p{}", n),
        invoice_number: format!("BILL-{:04}", 1000 + n),
        vendor: vendors[vendor].clone(),
        amount,
        due_date: today + Duration::days(due_in),
        status,
        items: None,
    };
    let mut first = bill(1, 0, 1_250.0, 12, FinanceStatus::Unpaid);
    first.items = Some(vec![
        LineItem::new("Printer paper (case)", 10.0, 45.0, TaxCode::Tax001),
        LineItem::new("Toner cartridges", 4.0, 200.0, TaxCode::Tax001),
    ]);
    vec![
        first,
        bill(2, 1, 4_800.0, 28, FinanceStatus::Unpaid),
        bill(3, 2, 640.0, 45, FinanceStatus::Unpaid),
        bill(4, 1, 2_300.0, 75, FinanceStatus::Unpaid),
        bill(5, 0, 980.0, 120, FinanceStatus::Unpaid),
        bill(6, 2, 410.0, -18, FinanceStatus::Overdue),
        bill(7, 1, 3_100.0, -52, FinanceStatus::Overdue),
        bill(8, 0, 275.0, -9, FinanceStatus::Paid),
    ]
}

/// Invoices issued 30 days before their due date
pub fn receivables(today: NaiveDate) -> Vec<Receivable> {
    let customers = customers();
    let invoice = |n: usize, customer: usize, amount: f64, due_in: i64, status: FinanceStatus| {
        let due_date = today + Duration::days(due_in);
        Receivable {
            id: format!("r{}", n),
            invoice_number: format!("INV-{:04}", 2000 + n),
            customer: customers[customer].clone(),
            amount,
            issue_date: due_date - Duration::days(30),
            due_date,
            status,
            items: None,
        }
    };
    vec![
        invoice(1, 0, 8_500.0, 5, FinanceStatus::Unpaid),
        invoice(2, 1, 3_200.0, 20, FinanceStatus::Unpaid),
        invoice(3, 2, 1_150.0, 38, FinanceStatus::Unpaid),
        invoice(4, 0, 12_000.0, 66, FinanceStatus::Unpaid),
        invoice(5, 1, 2_750.0, 95, FinanceStatus::Unpaid),
        invoice(6, 2, 640.0, -33, FinanceStatus::Overdue),
        invoice(7, 0, 5_400.0, -3, FinanceStatus::Paid),
    ]
}

pub fn payable_aging() -> Vec<AgingBucket> {
    vec![
        AgingBucket::new(AgingRange::Current, 15_000.0, 5, 45.0),
        AgingBucket::new(AgingRange::Days31To60, 8_000.0, 3, 24.0),
        AgingBucket::new(AgingRange::Days61To90, 6_000.0, 2, 18.0),
        AgingBucket::new(AgingRange::Over90, 4_000.0, 1, 13.0),
    ]
}

pub fn receivable_aging() -> Vec<AgingBucket> {
    vec![
        AgingBucket::new(AgingRange::Current, 25_000.0, 8, 55.0),
        AgingBucket::new(AgingRange::Days31To60, 12_000.0, 4, 25.0),
        AgingBucket::new(AgingRange::Days61To90, 8_000.0, 2, 15.0),
        AgingBucket::new(AgingRange::Over90, 3_000.0, 1, 5.0),
    ]
}

pub fn insights() -> FinanceInsights {
    let vendors = vendors();
    let customers = customers();
    FinanceInsights {
        avg_payment_time: 32,
        dso: 28,
        top_overdue_vendors: vec![
            OverdueVendor { vendor: vendors[1].clone(), amount: 3_100.0, days_past_due: 52 },
            OverdueVendor { vendor: vendors[2].clone(), amount: 410.0, days_past_due: 18 },
        ],
        top_customers: vec![
            TopCustomer { customer: customers[0].clone(), amount: 25_900.0 },
            TopCustomer { customer: customers[1].clone(), amount: 5_950.0 },
        ],
    }
}
