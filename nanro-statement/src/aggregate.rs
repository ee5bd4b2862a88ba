//! Statement totals and the per-transaction rows every renderer draws from.
//!
//! Classification comes from [`TransactionKind`]: credits are money in,
//! debits and transfers are money out, anything else is listed but counted
//! in neither total.

use chrono_tz::Tz;
use nanro_core::{DEFAULT_TIMEZONE, Transaction, TransactionKind, User, format_in_zone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₦";

const ROW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Holder details printed at the top of every statement
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfo {
    pub account_name: String,
    pub account_number: String,
    pub account_type: Option<String>,
    pub email: Option<String>,
    pub currency_symbol: String,
    pub timezone: Tz,
}

impl AccountInfo {
    pub fn new(account_name: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_number: account_number.into(),
            account_type: None,
            email: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }

    pub fn from_user(user: &User) -> Self {
        let mut info = Self::new(
            user.display_name(),
            user.account_number.clone().unwrap_or_default(),
        );
        info.email = user.email.clone();
        info
    }

    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = Some(account_type.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatementSummary {
    pub total_credits: f64,
    pub total_debits: f64,
    pub net_change: f64,
    pub transaction_count: usize,
    pub credit_count: usize,
    pub debit_count: usize,
}

/// Totals over the transactions exactly as given. No date filtering.
///
/// Each amount is taken to the cent before it is added, so the totals equal
/// the sum of the row values in [`statement_rows`].
pub fn summarize(transactions: &[Transaction]) -> StatementSummary {
    let mut summary = StatementSummary {
        transaction_count: transactions.len(),
        ..StatementSummary::default()
    };
    let (mut credits, mut debits) = (0i64, 0i64);
    for txn in transactions {
        if txn.kind.counts_as_credit() {
            credits = credits.saturating_add(to_minor(txn.amount));
            summary.credit_count += 1;
        } else if txn.kind.counts_as_debit() {
            debits = debits.saturating_add(to_minor(txn.amount));
            summary.debit_count += 1;
        }
    }
    summary.total_credits = from_minor(credits);
    summary.total_debits = from_minor(debits);
    summary.net_change = from_minor(credits.saturating_sub(debits));
    summary
}

/// Whole cents (kobo), half away from zero.
fn to_minor(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn from_minor(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// `amount` to the cent, as statements show it.
fn to_cents(amount: f64) -> f64 {
    from_minor(to_minor(amount))
}

/// One rendered line of a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementRow {
    pub date: String,
    pub description: String,
    pub reference: String,
    pub kind: TransactionKind,
    pub credit: Option<f64>,
    pub debit: Option<f64>,
    pub balance: f64,
}

pub fn statement_rows(transactions: &[Transaction], timezone: Tz) -> Vec<StatementRow> {
    transactions
        .iter()
        .map(|txn| {
            let date = txn
                .created_at_utc()
                .map(|dt| format_in_zone(dt, timezone, ROW_DATE_FORMAT))
                .unwrap_or_else(|| txn.created_at.clone());
            let description = if txn.description.trim().is_empty() {
                capitalize(txn.kind.label())
            } else {
                txn.description.clone()
            };
            StatementRow {
                date,
                description,
                reference: txn.reference.clone(),
                kind: txn.kind,
                credit: txn.kind.counts_as_credit().then(|| to_cents(txn.amount)),
                debit: txn.kind.counts_as_debit().then(|| to_cents(txn.amount)),
                balance: to_cents(txn.balance_after),
            }
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(kind: TransactionKind, amount: f64) -> Transaction {
        Transaction::new("1", kind, amount, "2026-03-01T09:30:00Z")
    }

    #[test]
    fn test_credit_debit_transfer_totals() {
        let txns = vec![
            txn(TransactionKind::Credit, 100.0),
            txn(TransactionKind::Debit, 40.0),
            txn(TransactionKind::Transfer, 25.0),
        ];
        let s = summarize(&txns);
        assert_eq!(s.total_credits, 100.0);
        assert_eq!(s.total_debits, 65.0);
        assert_eq!(s.net_change, 35.0);
        assert_eq!(s.transaction_count, 3);
        assert_eq!((s.credit_count, s.debit_count), (1, 2));
    }

    #[test]
    fn test_empty_input() {
        let s = summarize(&[]);
        assert_eq!(s, StatementSummary::default());
        assert!(statement_rows(&[], DEFAULT_TIMEZONE).is_empty());
    }

    #[test]
    fn test_string_and_numeric_amounts_agree() {
        let as_strings: Vec<Transaction> = serde_json::from_value(json!([
            {"type": "credit", "amount": "1,000.50", "balance_after": "1000.50"},
            {"type": "debit", "amount": "200.25"},
            {"type": "transfer", "amount": " 300 "},
            {"type": "debit", "amount": "not a number"},
            {"type": "credit"}
        ]))
        .unwrap();
        let as_numbers: Vec<Transaction> = serde_json::from_value(json!([
            {"type": "credit", "amount": 1000.5, "balance_after": 1000.5},
            {"type": "debit", "amount": 200.25},
            {"type": "transfer", "amount": 300},
            {"type": "debit", "amount": 0},
            {"type": "credit", "amount": null}
        ]))
        .unwrap();
        assert_eq!(summarize(&as_strings), summarize(&as_numbers));
        assert_eq!(summarize(&as_strings).total_debits, 500.25);
    }

    #[test]
    fn test_sub_cent_amounts_total_the_rows() {
        let txns: Vec<Transaction> = (0..10).map(|_| txn(TransactionKind::Credit, 0.005)).collect();
        let s = summarize(&txns);
        let rows = statement_rows(&txns, DEFAULT_TIMEZONE);
        let column: f64 = rows.iter().filter_map(|r| r.credit).sum();
        assert_eq!(rows[0].credit, Some(0.01));
        assert_eq!(s.total_credits, 0.1);
        assert!((column - s.total_credits).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_kind_is_listed_but_not_counted() {
        let txns = vec![
            txn(TransactionKind::Credit, 10.0),
            txn(TransactionKind::Unknown, 99.0),
        ];
        let s = summarize(&txns);
        assert_eq!(s.total_credits, 10.0);
        assert_eq!(s.total_debits, 0.0);
        assert_eq!(s.transaction_count, 2);

        let rows = statement_rows(&txns, DEFAULT_TIMEZONE);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[1].credit, rows[1].debit), (None, None));
    }

    #[test]
    fn test_rows_are_in_local_time_and_keep_order() {
        let txns = vec![
            txn(TransactionKind::Debit, 5.0)
                .with_description("POS purchase")
                .with_reference("NRB-2"),
            Transaction::new("2", TransactionKind::Credit, 7.0, "not a date"),
        ];
        let rows = statement_rows(&txns, DEFAULT_TIMEZONE);
        // Lagos is UTC+1
        assert_eq!(rows[0].date, "2026-03-01 10:30");
        assert_eq!(rows[0].debit, Some(5.0));
        assert_eq!(rows[0].reference, "NRB-2");
        assert_eq!(rows[1].date, "not a date");
        assert_eq!(rows[1].description, "Credit");
    }
}
