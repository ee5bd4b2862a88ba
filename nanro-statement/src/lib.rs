//! nanro-statement: account statement totals, HTML/CSV/Excel rendering and export

pub mod aggregate;
pub mod error;
pub mod export;
pub mod period;
pub mod render;
pub mod service;

pub use aggregate::{
    AccountInfo, DEFAULT_CURRENCY_SYMBOL, StatementRow, StatementSummary, statement_rows, summarize,
};
pub use error::{StatementError, StatementResult};
pub use export::{export_statement, suggested_filename};
pub use period::StatementPeriod;
pub use render::{
    StatementFormat, format_amount, format_money, render, render_csv, render_excel, render_html,
};
pub use service::{GeneratedStatement, StatementOutcome, StatementService, StatementSource};
