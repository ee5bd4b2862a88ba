use nanro_core::{Notification, Page};

use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiResult;

impl ApiClient {
    pub async fn notifications(&self, page: u32) -> ApiResult<Page<Notification>> {
        self.fetch_page(ApiRequest::get("/notifications").query("page", page))
            .await
    }

    pub async fn mark_notification_read(&self, id: &str) -> ApiResult<()> {
        self.send::<serde_json::Value>(ApiRequest::post(format!("/notifications/{id}/read")))
            .await
            .map(drop)
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.send::<serde_json::Value>(ApiRequest::post("/notifications/read-all"))
            .await
            .map(drop)
    }
}
