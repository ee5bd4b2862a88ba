//! Transaction history and statement fetches.

use chrono::NaiveDate;
use nanro_core::{Page, Transaction};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

/// Upper bound on pages walked for one statement period.
/// Upper bound on pages followed in one listing.
pub const MAX_PAGES: u32 = 100;

/// Listing payloads come either as a bare array or as a paginated object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Bare(Vec<T>),
    Paged(Page<T>),
}

impl<T> From<Listing<T>> for Page<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Paged(page) => page,
            Listing::Bare(items) => Page {
                total: Some(items.len() as u64),
                items,
                current_page: 1,
                last_page: 1,
            },
        }
    }
}

impl ApiClient {
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ApiResult<Page<T>> {
        let listing: Listing<T> = self.send(request).await?;
        Ok(listing.into())
    }

    pub async fn transactions(&self, page: u32, per_page: u32) -> ApiResult<Page<Transaction>> {
        self.fetch_page(
            ApiRequest::get("/transactions")
                .query("page", page)
                .query("per_page", per_page),
        )
        .await
    }

    pub async fn transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.send(ApiRequest::get(format!("/transactions/{id}"))).await
    }

    /// Every transaction the server reports for the inclusive date range,
    /// in the order received. The range is filtered server-side.
    pub async fn statement_transactions(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<Transaction>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let request = ApiRequest::get("/transactions/statement")
                .query("start_date", start.format("%Y-%m-%d"))
                .query("end_date", end.format("%Y-%m-%d"))
                .query("page", page);
            let listing: Page<Transaction> = self.fetch_page(request).await?;
            debug!(page, count = listing.items.len(), "statement page received");
            let more = listing.has_more();
            all.extend(listing.items);
            if !more || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }
        Ok(all)
    }
}
