use nanro_core::{Account, Balance};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn balance(&self) -> ApiResult<Balance> {
        self.send(ApiRequest::get("/account/balance")).await
    }

    pub async fn accounts(&self) -> ApiResult<Vec<Account>> {
        self.send(ApiRequest::get("/accounts")).await
    }
}
