//! CSV statement: metadata lines, a column header, one record per
//! transaction, then the summary lines. Records have different widths, so
//! the writer is flexible.

use nanro_core::Transaction;

use super::STATEMENT_TITLE;
use crate::aggregate::{AccountInfo, StatementSummary, statement_rows};
use crate::error::StatementResult;
use crate::period::StatementPeriod;

pub const CSV_COLUMNS: [&str; 6] = ["Date", "Description", "Reference", "Credit", "Debit", "Balance"];

pub fn render_csv(
    transactions: &[Transaction],
    summary: &StatementSummary,
    account: &AccountInfo,
    period: &StatementPeriod,
) -> StatementResult<String> {
    let mut wtr = ::csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    wtr.write_record([STATEMENT_TITLE])?;
    wtr.write_record(["Account Name", account.account_name.as_str()])?;
    wtr.write_record(["Account Number", account.account_number.as_str()])?;
    if let Some(kind) = &account.account_type {
        wtr.write_record(["Account Type", kind.as_str()])?;
    }
    if let Some(email) = &account.email {
        wtr.write_record(["Email", email.as_str()])?;
    }
    let from = period.start.format("%Y-%m-%d").to_string();
    let to = period.end.format("%Y-%m-%d").to_string();
    wtr.write_record(["Period", from.as_str(), to.as_str()])?;
    wtr.write_record(["Currency", account.currency_symbol.as_str()])?;

    wtr.write_record(CSV_COLUMNS)?;
    for row in statement_rows(transactions, account.timezone) {
        wtr.write_record([
            row.date,
            row.description,
            row.reference,
            row.credit.map(plain).unwrap_or_default(),
            row.debit.map(plain).unwrap_or_default(),
            plain(row.balance),
        ])?;
    }

    wtr.write_record(["Transaction Count".to_string(), summary.transaction_count.to_string()])?;
    wtr.write_record(["Total Credits".to_string(), plain(summary.total_credits)])?;
    wtr.write_record(["Total Debits".to_string(), plain(summary.total_debits)])?;
    wtr.write_record(["Net Change".to_string(), plain(summary.net_change)])?;

    let bytes = wtr
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Spreadsheet-friendly number: two decimals, no grouping, no symbol.
fn plain(amount: f64) -> String {
    format!("{amount:.2}")
}
