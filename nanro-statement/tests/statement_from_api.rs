use std::sync::Arc;

use chrono::{TimeZone, Utc};
use httpmock::prelude::*;
use nanro_client::{ApiClient, ClientConfig, MemorySessionStore};
use nanro_statement::{
    AccountInfo, StatementFormat, StatementOutcome, StatementPeriod, StatementService,
};
use serde_json::json;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(
        &ClientConfig::new(server.base_url()),
        Arc::new(MemorySessionStore::with_token("tok")),
    )
    .unwrap()
}

fn column_total(doc: &str, column: usize) -> f64 {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(doc.as_bytes());
    let mut in_rows = false;
    let mut total = 0.0;
    for record in rdr.records() {
        let record = record.unwrap();
        if record.get(0) == Some("Date") {
            in_rows = true;
            continue;
        }
        if in_rows && record.len() == 6 {
            total += record[column].parse::<f64>().unwrap_or(0.0);
        }
    }
    total
}

fn summary_value(doc: &str, label: &str) -> f64 {
    doc.lines()
        .find_map(|line| line.strip_prefix(&format!("{label},")))
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("missing summary line {label}"))
}

#[tokio::test]
async fn test_csv_columns_agree_with_summary_across_pages() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transactions/statement")
                .query_param("start_date", "2026-03-01")
                .query_param("end_date", "2026-03-31")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "transactions": [
                        {"id": 1, "type": "credit", "amount": "150,000.00", "created_at": "2026-03-01 08:00:00",
                         "reference": "NRB-1", "description": "Salary", "balance_after": "150000"},
                        {"id": 2, "type": "debit", "amount": 1250.5, "created_at": "2026-03-02 09:15:00",
                         "reference": "NRB-2", "description": "POS, Shoprite", "balance_after": 148749.5},
                        {"id": 3, "type": "transfer", "amount": "20000", "created_at": "2026-03-05T12:00:00Z",
                         "reference": "NRB-3", "description": "To Chidi", "balance_after": "128749.50"}
                    ],
                    "current_page": 1,
                    "last_page": 2
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transactions/statement")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "transactions": [
                        {"id": 4, "type": "reversal", "amount": "99", "created_at": "2026-03-06 10:00:00"},
                        {"id": 5, "type": "credit", "amount": "bad", "created_at": "2026-03-07 10:00:00"},
                        {"id": 6, "type": "debit", "amount": "0.49", "created_at": "2026-03-08 10:00:00"}
                    ],
                    "current_page": 2,
                    "last_page": 2
                }
            }));
        })
        .await;

    let account = AccountInfo::new("Ada Obi", "0123456789").with_account_type("Savings");
    let service = StatementService::new(client(&server), account);
    let period = StatementPeriod::parse("2026-03-01", "2026-03-31").unwrap();
    let now = Utc.with_ymd_and_hms(2026, 4, 1, 9, 0, 0).unwrap();

    let StatementOutcome::Ready(statement) = service
        .generate_at(&period, StatementFormat::Csv, now)
        .await
        .unwrap()
    else {
        panic!("expected a statement");
    };

    let summary = statement.summary;
    assert_eq!(summary.transaction_count, 6);
    assert_eq!(summary.total_credits, 150_000.0);
    assert!((summary.total_debits - 21_250.99).abs() < 1e-9);
    assert!((summary.net_change - 128_749.01).abs() < 1e-9);

    assert!((column_total(&statement.content, 3) - summary.total_credits).abs() < 0.005);
    assert!((column_total(&statement.content, 4) - summary.total_debits).abs() < 0.005);
    assert!((summary_value(&statement.content, "Total Credits") - summary.total_credits).abs() < 0.005);
    assert!((summary_value(&statement.content, "Total Debits") - summary.total_debits).abs() < 0.005);
    assert_eq!(summary_value(&statement.content, "Transaction Count"), 6.0);

    let dir = tempfile::tempdir().unwrap();
    let path = statement.save(dir.path()).await.unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("{}_Nanro_Statement_2026-03-01_to_2026-03-31.csv", now.timestamp_millis())
    );
    assert_eq!(std::fs::read_to_string(path).unwrap(), statement.content);
}

#[tokio::test]
async fn test_bare_array_and_empty_period() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transactions/statement")
                .query_param("start_date", "2026-01-01");
            then.status(200).json_body(json!({"success": true, "data": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transactions/statement")
                .query_param("start_date", "2026-02-01");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{"id": 1, "type": "credit", "amount": "100", "created_at": "2026-02-03 10:00:00"}]
            }));
        })
        .await;

    let service = StatementService::new(client(&server), AccountInfo::new("Ada", "01"));

    let january = StatementPeriod::parse("2026-01-01", "2026-01-31").unwrap();
    let outcome = service.generate(&january, StatementFormat::Pdf).await.unwrap();
    assert_eq!(outcome, StatementOutcome::NoTransactions(january));

    let february = StatementPeriod::parse("2026-02-01", "2026-02-28").unwrap();
    match service.generate(&february, StatementFormat::Excel).await.unwrap() {
        StatementOutcome::Ready(statement) => {
            assert!(statement.filename.ends_with("_Nanro_Statement_2026-02-01_to_2026-02-28.xls"));
            assert_eq!(statement.content.matches("<tr class=\"txn\">").count(), 1);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_sub_cent_amounts_and_malformed_rows() {
    let server = MockServer::start_async().await;
    let mut rows: Vec<serde_json::Value> = (0..10)
        .map(|i| json!({"id": i, "type": "credit", "amount": "0.005", "created_at": "2026-05-02 10:00:00"}))
        .collect();
    rows.push(json!({"id": 10, "type": null, "amount": "5", "status": 1, "created_at": "2026-05-03 10:00:00"}));
    rows.push(json!({"id": 11, "type": "DEBIT", "amount": 1.234, "created_at": "2026-05-04 10:00:00"}));
    server
        .mock_async(|when, then| {
            when.method(GET).path("/transactions/statement");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"transactions": rows, "current_page": 1, "last_page": 1}
            }));
        })
        .await;

    let service = StatementService::new(client(&server), AccountInfo::new("Ada", "01"));
    let period = StatementPeriod::parse("2026-05-01", "2026-05-31").unwrap();
    let StatementOutcome::Ready(statement) = service
        .generate(&period, StatementFormat::Csv)
        .await
        .unwrap()
    else {
        panic!("expected a statement");
    };

    let summary = statement.summary;
    assert_eq!(summary.transaction_count, 12);
    assert_eq!((summary.credit_count, summary.debit_count), (10, 1));
    assert_eq!(summary.total_credits, 0.1);
    assert_eq!(summary.total_debits, 1.23);

    assert!((column_total(&statement.content, 3) - summary.total_credits).abs() < 1e-9);
    assert!((column_total(&statement.content, 4) - summary.total_debits).abs() < 1e-9);
    assert_eq!(summary_value(&statement.content, "Total Credits"), summary.total_credits);
    assert_eq!(summary_value(&statement.content, "Total Debits"), summary.total_debits);
}
