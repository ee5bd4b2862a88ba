//! Statement renderers. Each one is a pure function of the transactions,
//! the already-computed summary, the holder details and the period; none
//! recomputes totals.

mod csv;
mod excel;
mod html;

use std::fmt;
use std::str::FromStr;

use nanro_core::Transaction;
use serde::{Deserialize, Serialize};

use crate::aggregate::{AccountInfo, StatementSummary};
use crate::error::StatementResult;
use crate::period::StatementPeriod;

pub use self::csv::render_csv;
pub use self::excel::render_excel;
pub use self::html::render_html;

pub const STATEMENT_TITLE: &str = "Nanro Bank Account Statement";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementFormat {
    /// HTML source for the platform's PDF printer
    Pdf,
    Csv,
    Excel,
}

impl StatementFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StatementFormat::Pdf => "html",
            StatementFormat::Csv => "csv",
            StatementFormat::Excel => "xls",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            StatementFormat::Pdf => "text/html",
            StatementFormat::Csv => "text/csv",
            StatementFormat::Excel => "application/vnd.ms-excel",
        }
    }
}

impl fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementFormat::Pdf => "pdf",
            StatementFormat::Csv => "csv",
            StatementFormat::Excel => "excel",
        };
        f.write_str(name)
    }
}

impl FromStr for StatementFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" | "html" => Ok(StatementFormat::Pdf),
            "csv" => Ok(StatementFormat::Csv),
            "excel" | "xls" => Ok(StatementFormat::Excel),
            other => Err(format!("unknown statement format '{other}' (pdf, csv, excel)")),
        }
    }
}

/// Render in the requested format.
pub fn render(
    format: StatementFormat,
    transactions: &[Transaction],
    summary: &StatementSummary,
    account: &AccountInfo,
    period: &StatementPeriod,
) -> StatementResult<String> {
    match format {
        StatementFormat::Pdf => Ok(render_html(transactions, summary, account, period)),
        StatementFormat::Csv => render_csv(transactions, summary, account, period),
        StatementFormat::Excel => Ok(render_excel(transactions, summary, account, period)),
    }
}

/// `1234567.5` -> `1,234,567.50`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

pub fn format_money(symbol: &str, amount: f64) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(abs) => format!("-{symbol}{abs}"),
        None => format!("{symbol}{formatted}"),
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
