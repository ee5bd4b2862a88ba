use nanro_core::{BillCategory, BillPaymentReceipt, BillPaymentRequest, Biller};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn bill_categories(&self) -> ApiResult<Vec<BillCategory>> {
        self.send(ApiRequest::get("/bills/categories")).await
    }

    pub async fn billers(&self, category: &str) -> ApiResult<Vec<Biller>> {
        self.send(ApiRequest::get(format!("/bills/categories/{category}/billers")))
            .await
    }

    pub async fn pay_bill(&self, request: &BillPaymentRequest) -> ApiResult<BillPaymentReceipt> {
        self.send(ApiRequest::post("/bills/pay").json(request)?).await
    }
}
