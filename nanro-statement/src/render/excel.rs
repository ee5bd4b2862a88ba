//! Excel-flavoured HTML: a plain table inside the Office workbook hints,
//! which Excel and LibreOffice open as a single worksheet.

use std::fmt::Write;

use nanro_core::Transaction;

use super::{STATEMENT_TITLE, escape_html};
use crate::aggregate::{AccountInfo, StatementSummary, statement_rows};
use crate::period::StatementPeriod;

const WORKSHEET_NAME: &str = "Statement";

const HEAD: &str = concat!(
    "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" ",
    "xmlns:x=\"urn:schemas-microsoft-com:office:excel\" ",
    "xmlns=\"http://www.w3.org/TR/REC-html40\">\n",
    "<head>\n<meta charset=\"UTF-8\">\n",
    "<!--[if gte mso 9]><xml><x:ExcelWorkbook><x:ExcelWorksheets><x:ExcelWorksheet>",
);

const HEAD_TAIL: &str = concat!(
    "<x:WorksheetOptions><x:DisplayGridlines/></x:WorksheetOptions>",
    "</x:ExcelWorksheet></x:ExcelWorksheets></x:ExcelWorkbook></xml><![endif]-->\n",
    "<style>td.num { mso-number-format: \"\\#\\,\\#\\#0\\.00\"; }</style>\n",
    "</head>\n",
);

pub fn render_excel(
    transactions: &[Transaction],
    summary: &StatementSummary,
    account: &AccountInfo,
    period: &StatementPeriod,
) -> String {
    let mut doc = String::from(HEAD);
    let _ = write!(doc, "<x:Name>{WORKSHEET_NAME}</x:Name>");
    doc.push_str(HEAD_TAIL);
    doc.push_str("<body>\n<table border=\"1\">\n");

    let _ = writeln!(doc, "<tr><th colspan=\"6\">{STATEMENT_TITLE}</th></tr>");
    label_row(&mut doc, "Account Name", &account.account_name);
    label_row(&mut doc, "Account Number", &account.account_number);
    if let Some(kind) = &account.account_type {
        label_row(&mut doc, "Account Type", kind);
    }
    if let Some(email) = &account.email {
        label_row(&mut doc, "Email", email);
    }
    label_row(&mut doc, "Period", &period.label());
    label_row(&mut doc, "Currency", &account.currency_symbol);
    doc.push_str("<tr></tr>\n");

    doc.push_str("<tr><th>Date</th><th>Description</th><th>Reference</th><th>Credit</th><th>Debit</th><th>Balance</th></tr>\n");
    for row in statement_rows(transactions, account.timezone) {
        let _ = writeln!(
            doc,
            "<tr class=\"txn\"><td>{}</td><td>{}</td><td>{}</td>{}{}{}</tr>",
            escape_html(&row.date),
            escape_html(&row.description),
            escape_html(&row.reference),
            number_cell(row.credit),
            number_cell(row.debit),
            number_cell(Some(row.balance)),
        );
    }
    doc.push_str("<tr></tr>\n");

    let _ = writeln!(
        doc,
        "<tr><td colspan=\"5\">Transaction Count</td><td>{}</td></tr>",
        summary.transaction_count
    );
    total_row(&mut doc, "Total Credits", summary.total_credits);
    total_row(&mut doc, "Total Debits", summary.total_debits);
    total_row(&mut doc, "Net Change", summary.net_change);

    doc.push_str("</table>\n</body>\n</html>\n");
    doc
}

fn number_cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("<td class=\"num\">{v:.2}</td>"),
        None => "<td></td>".to_string(),
    }
}

fn label_row(doc: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        doc,
        "<tr><td><b>{label}</b></td><td colspan=\"5\">{}</td></tr>",
        escape_html(value)
    );
}

fn total_row(doc: &mut String, label: &str, value: f64) {
    let _ = writeln!(
        doc,
        "<tr><td colspan=\"5\"><b>{label}</b></td><td class=\"num\">{value:.2}</td></tr>"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use chrono::NaiveDate;
    use nanro_core::TransactionKind;

    #[test]
    fn test_workbook_hints_and_rows() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let period = StatementPeriod::new(d, d).unwrap();
        let txns = vec![
            Transaction::new("1", TransactionKind::Credit, 100.0, "2026-03-01 08:00:00"),
            Transaction::new("2", TransactionKind::Debit, 40.0, "2026-03-01 09:00:00"),
        ];
        let doc = render_excel(&txns, &summarize(&txns), &AccountInfo::new("Ada & Co", "01"), &period);

        assert!(doc.contains("urn:schemas-microsoft-com:office:excel"));
        assert!(doc.contains("<x:Name>Statement</x:Name>"));
        assert!(doc.contains("Ada &amp; Co"));
        assert_eq!(doc.matches("<tr class=\"txn\">").count(), 2);
        assert!(doc.contains("<b>Net Change</b></td><td class=\"num\">60.00</td>"));
    }

    #[test]
    fn test_account_block_includes_email() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let period = StatementPeriod::new(d, d).unwrap();
        let account = AccountInfo::new("Ada", "01").with_email("ada@example.com");
        let doc = render_excel(&[], &summarize(&[]), &account, &period);
        assert!(doc.contains("<tr><td><b>Email</b></td><td colspan=\"5\">ada@example.com</td></tr>"));

        let doc = render_excel(&[], &summarize(&[]), &AccountInfo::new("Ada", "01"), &period);
        assert!(!doc.contains("<b>Email</b>"));
    }
}
