//! CSV export of bills and invoices

use crate::error::{CoreError, CoreResult};
use crate::models::FinanceRecord;

pub const CSV_HEADER: [&str; 5] = ["Invoice", "Party", "Date", "Amount", "Status"];

/// Header plus one row per record, in the order given
pub fn records_to_csv<T: FinanceRecord>(records: &[&T]) -> CoreResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.invoice_number().to_string(),
            record.party().name.clone(),
            record.display_date().format("%Y-%m-%d").to_string(),
            format!("{:.2}", record.amount()),
            record.status().to_string(),
        ])?;
    }
    writer.into_inner().map_err(|e| CoreError::ExportError {
        message: e.to_string(),
    })
}

/// Download file name, e.g. `payables-2024-05-01.csv`
pub fn export_filename(kind: crate::types::DocumentKind, today: chrono::NaiveDate) -> String {
    format!("{}s-{}.csv", kind, today.format("%Y-%m-%d"))
}
