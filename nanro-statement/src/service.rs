//! Statement generation: fetch, aggregate, render.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nanro_client::{ApiClient, ApiResult};
use nanro_core::{Transaction, epoch_millis};
use tracing::info;

use crate::aggregate::{AccountInfo, StatementSummary, summarize};
use crate::error::StatementResult;
use crate::export::{export_statement, suggested_filename};
use crate::period::StatementPeriod;
use crate::render::{StatementFormat, render};

/// Where statement transactions come from
#[async_trait]
pub trait StatementSource: Send + Sync {
    /// All transactions in the inclusive period, as the server filtered them.
    async fn fetch_statement(&self, period: &StatementPeriod) -> ApiResult<Vec<Transaction>>;
}

#[async_trait]
impl StatementSource for ApiClient {
    async fn fetch_statement(&self, period: &StatementPeriod) -> ApiResult<Vec<Transaction>> {
        self.statement_transactions(period.start, period.end).await
    }
}

/// A rendered statement ready to be saved or shared
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedStatement {
    pub format: StatementFormat,
    pub filename: String,
    pub content: String,
    pub summary: StatementSummary,
}

impl GeneratedStatement {
    pub async fn save(&self, dir: &Path) -> StatementResult<PathBuf> {
        export_statement(dir, &self.filename, &self.content).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutcome {
    /// Nothing happened in the period; nothing was rendered
    NoTransactions(StatementPeriod),
    Ready(GeneratedStatement),
}

pub struct StatementService<S> {
    source: S,
    account: AccountInfo,
}

impl<S: StatementSource> StatementService<S> {
    pub fn new(source: S, account: AccountInfo) -> Self {
        Self { source, account }
    }

    pub fn account(&self) -> &AccountInfo {
        &self.account
    }

    pub async fn generate(
        &self,
        period: &StatementPeriod,
        format: StatementFormat,
    ) -> StatementResult<StatementOutcome> {
        self.generate_at(period, format, Utc::now()).await
    }

    /// Like [`StatementService::generate`] with an explicit timestamp for
    /// the file name.
    pub async fn generate_at(
        &self,
        period: &StatementPeriod,
        format: StatementFormat,
        now: DateTime<Utc>,
    ) -> StatementResult<StatementOutcome> {
        let transactions = self.source.fetch_statement(period).await?;
        if transactions.is_empty() {
            info!(period = %period.label(), "no transactions in period");
            return Ok(StatementOutcome::NoTransactions(*period));
        }

        let summary = summarize(&transactions);
        let content = render(format, &transactions, &summary, &self.account, period)?;
        info!(
            period = %period.label(),
            %format,
            count = summary.transaction_count,
            "statement rendered"
        );

        Ok(StatementOutcome::Ready(GeneratedStatement {
            format,
            filename: suggested_filename(period, format, epoch_millis(now)),
            content,
            summary,
        }))
    }
}
