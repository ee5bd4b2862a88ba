//! Styled HTML statement, handed to the platform's HTML-to-PDF printer.

use std::fmt::Write;

use nanro_core::Transaction;

use super::{STATEMENT_TITLE, escape_html, format_money};
use crate::aggregate::{AccountInfo, StatementSummary, statement_rows};
use crate::period::StatementPeriod;

const STYLE: &str = r#"
  body { font-family: Helvetica, Arial, sans-serif; color: #1f2933; margin: 32px; }
  h1 { color: #0b3d91; font-size: 22px; margin-bottom: 4px; }
  .period { color: #52606d; margin-top: 0; }
  .account { border: 1px solid #d9e2ec; border-radius: 6px; padding: 12px 16px; margin: 16px 0; }
  .account td { padding: 2px 12px 2px 0; }
  table.transactions { width: 100%; border-collapse: collapse; font-size: 12px; }
  table.transactions th { background: #0b3d91; color: #fff; text-align: left; padding: 8px; }
  table.transactions td { border-bottom: 1px solid #e4e7eb; padding: 6px 8px; vertical-align: top; }
  td.amount, th.amount { text-align: right; white-space: nowrap; }
  .credit { color: #127a3a; }
  .debit { color: #b42318; }
  .ref { color: #7b8794; font-size: 10px; }
  .summary { margin-top: 20px; width: 320px; margin-left: auto; }
  .summary td { padding: 4px 8px; }
  .summary tr.net td { border-top: 2px solid #0b3d91; font-weight: bold; }
  .empty { text-align: center; color: #7b8794; padding: 24px; }
"#;

pub fn render_html(
    transactions: &[Transaction],
    summary: &StatementSummary,
    account: &AccountInfo,
    period: &StatementPeriod,
) -> String {
    let symbol = account.currency_symbol.as_str();
    let mut doc = String::new();

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    let _ = writeln!(doc, "<title>{STATEMENT_TITLE}</title>");
    let _ = writeln!(doc, "<style>{STYLE}</style>");
    doc.push_str("</head>\n<body>\n");

    let _ = writeln!(doc, "<h1>{STATEMENT_TITLE}</h1>");
    let _ = writeln!(doc, "<p class=\"period\">{}</p>", escape_html(&period.label()));

    doc.push_str("<div class=\"account\"><table>\n");
    account_line(&mut doc, "Account Name", &account.account_name);
    account_line(&mut doc, "Account Number", &account.account_number);
    if let Some(kind) = &account.account_type {
        account_line(&mut doc, "Account Type", kind);
    }
    if let Some(email) = &account.email {
        account_line(&mut doc, "Email", email);
    }
    doc.push_str("</table></div>\n");

    doc.push_str("<table class=\"transactions\">\n<thead><tr>");
    doc.push_str("<th>Date</th><th>Description</th>");
    doc.push_str("<th class=\"amount\">Credit</th><th class=\"amount\">Debit</th><th class=\"amount\">Balance</th>");
    doc.push_str("</tr></thead>\n<tbody>\n");

    let rows = statement_rows(transactions, account.timezone);
    for row in &rows {
        let credit = row.credit.map(|a| format_money(symbol, a)).unwrap_or_default();
        let debit = row.debit.map(|a| format_money(symbol, a)).unwrap_or_default();
        let reference = if row.reference.is_empty() {
            String::new()
        } else {
            format!("<br><span class=\"ref\">Ref: {}</span>", escape_html(&row.reference))
        };
        let _ = writeln!(
            doc,
            "<tr class=\"txn\"><td>{}</td><td>{}{}</td><td class=\"amount credit\">{}</td><td class=\"amount debit\">{}</td><td class=\"amount\">{}</td></tr>",
            escape_html(&row.date),
            escape_html(&row.description),
            reference,
            escape_html(&credit),
            escape_html(&debit),
            escape_html(&format_money(symbol, row.balance)),
        );
    }
    if rows.is_empty() {
        doc.push_str("<tr><td class=\"empty\" colspan=\"5\">No transactions in this period</td></tr>\n");
    }
    doc.push_str("</tbody>\n</table>\n");

    doc.push_str("<table class=\"summary\">\n");
    summary_line(&mut doc, "", "Transactions", &summary.transaction_count.to_string());
    summary_line(&mut doc, "credit", "Total Credits", &format_money(symbol, summary.total_credits));
    summary_line(&mut doc, "debit", "Total Debits", &format_money(symbol, summary.total_debits));
    summary_line(&mut doc, "net", "Net Change", &format_money(symbol, summary.net_change));
    doc.push_str("</table>\n</body>\n</html>\n");

    doc
}

fn account_line(doc: &mut String, label: &str, value: &str) {
    let _ = writeln!(doc, "<tr><td><strong>{label}</strong></td><td>{}</td></tr>", escape_html(value));
}

fn summary_line(doc: &mut String, class: &str, label: &str, value: &str) {
    let _ = writeln!(
        doc,
        "<tr class=\"{class}\"><td>{label}</td><td class=\"amount\">{}</td></tr>",
        escape_html(value)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use chrono::NaiveDate;
    use nanro_core::TransactionKind;

    fn period() -> StatementPeriod {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        StatementPeriod::new(d, d).unwrap()
    }

    #[test]
    fn test_rows_and_summary() {
        let txns = vec![
            Transaction::new("1", TransactionKind::Credit, 100.0, "2026-03-01 08:00:00")
                .with_description("Salary <March>")
                .with_reference("NRB-1")
                .with_balance_after(100.0),
            Transaction::new("2", TransactionKind::Transfer, 25.0, "2026-03-01 09:00:00")
                .with_balance_after(75.0),
        ];
        let summary = summarize(&txns);
        let account = AccountInfo::new("Ada Obi", "0123456789").with_account_type("Savings");
        let html = render_html(&txns, &summary, &account, &period());

        assert_eq!(html.matches("<tr class=\"txn\">").count(), 2);
        assert!(html.contains("Salary &lt;March&gt;"));
        assert!(html.contains("Ref: NRB-1"));
        assert!(html.contains("Account Type"));
        assert!(html.contains("₦100.00"));
        assert!(html.contains("<td>Net Change</td><td class=\"amount\">₦75.00</td>"));
    }

    #[test]
    fn test_empty_statement_has_no_rows() {
        let summary = summarize(&[]);
        let html = render_html(&[], &summary, &AccountInfo::new("Ada", "1"), &period());
        assert_eq!(html.matches("<tr class=\"txn\">").count(), 0);
        assert!(html.contains("No transactions in this period"));
        assert!(html.contains("<td>Total Credits</td><td class=\"amount\">₦0.00</td>"));
    }
}
