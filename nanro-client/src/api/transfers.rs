use nanro_core::{Beneficiary, ResolvedAccount, TransferReceipt, TransferRequest};
use serde_json::json;

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

impl ApiClient {
    /// Name enquiry on a destination account before sending money.
    pub async fn resolve_account(
        &self,
        account_number: &str,
        bank_code: Option<&str>,
    ) -> ApiResult<ResolvedAccount> {
        let body = json!({ "account_number": account_number, "bank_code": bank_code });
        self.send(ApiRequest::post("/transfers/resolve-account").json(&body)?)
            .await
    }

    pub async fn beneficiaries(&self) -> ApiResult<Vec<Beneficiary>> {
        self.send(ApiRequest::get("/beneficiaries")).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> ApiResult<TransferReceipt> {
        self.send(ApiRequest::post("/transfers").json(request)?).await
    }
}
