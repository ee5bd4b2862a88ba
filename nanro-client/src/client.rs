//! HTTP client with bearer decoration and single-flight token refresh.
//!
//! Every request except login, register and biometric login carries the
//! stored bearer token. A 401 on any other request triggers at most one
//! concurrent refresh; the request is then replayed once with the new token.
//! A failed refresh wipes the session and announces [`SessionEvent::Expired`].

use std::sync::Arc;

use nanro_core::{Envelope, User, first_field_error};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub use reqwest::Method;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::notify::{Notifier, SessionEvent, TracingNotifier};
use crate::session::SessionStore;
use crate::single_flight::{Joined, SingleFlight};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const BIOMETRIC_LOGIN_PATH: &str = "/auth/biometric-login";
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Shared by every clone of one [`ApiClient`].
pub type RefreshCoordinator = SingleFlight<String, ApiError>;

/// Endpoints that must never carry a prior session's token.
const AUTH_EXEMPT_PATHS: [&str; 3] = [LOGIN_PATH, REGISTER_PATH, BIOMETRIC_LOGIN_PATH];

/// A request description that can be replayed after a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn is_auth_exempt(&self) -> bool {
        let path = self.path.split('?').next().unwrap_or("").trim_end_matches('/');
        AUTH_EXEMPT_PATHS.contains(&path)
    }
}

#[derive(Debug, Deserialize)]
struct RefreshedToken {
    #[serde(alias = "access_token")]
    token: String,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    refresh: Arc<RefreshCoordinator>,
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Decode(format!("failed to create HTTP client: {e}")))?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
            notifier: Arc::new(TracingNotifier),
            refresh: Arc::new(RefreshCoordinator::new()),
            events,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Session lifecycle events (refreshed / expired).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Send a request and unwrap its envelope. Failures raise a notice
    /// before they are returned.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        let result = self.dispatch(&request).await;
        if let Err(err) = &result {
            if let Some(notice) = err.notice() {
                warn!(method = %request.method, path = %request.path, "request failed: {err}");
                self.notifier.notify(notice);
            }
        }
        result
    }

    /// Like [`ApiClient::send`] but without raising a notice.
    pub async fn send_quiet<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.dispatch(&request).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        if request.is_auth_exempt() {
            return self.execute(request, None).await;
        }

        // Generation first: if a refresh lands between these two reads we
        // hold the new token with an old generation, which is harmless.
        let generation = self.refresh.generation();
        let token = self.store.token().await?;

        match self.execute(request, token.as_deref()).await {
            Err(ApiError::Unauthorized(message)) => {
                if token.is_none() {
                    return Err(ApiError::Unauthorized(message));
                }
                let fresh = self.renew_session(generation).await?;
                debug!(method = %request.method, path = %request.path, "replaying with refreshed token");
                // The replay is the one retry; another 401 surfaces as-is.
                self.execute(request, Some(&fresh)).await
            }
            other => other,
        }
    }

    async fn renew_session(&self, seen_generation: u64) -> ApiResult<String> {
        match self.refresh.run(seen_generation, || self.refresh_token()).await {
            Joined::Led(result) | Joined::Waited(result) => result,
            Joined::Superseded => self.store.token().await?.ok_or(ApiError::SessionExpired),
            Joined::Abandoned => Err(ApiError::SessionExpired),
        }
    }

    /// Only ever run by the single-flight leader.
    async fn refresh_token(&self) -> ApiResult<String> {
        info!("access token rejected; refreshing session");
        let current = self.store.token().await?;
        let refreshed = self
            .execute::<RefreshedToken>(&ApiRequest::post(REFRESH_PATH), current.as_deref())
            .await;

        match refreshed {
            Ok(RefreshedToken { token, user }) => {
                self.store.set_token(&token).await?;
                if let Some(user) = user {
                    self.store.set_user(&user).await?;
                }
                info!("session refreshed");
                let _ = self.events.send(SessionEvent::Refreshed);
                Ok(token)
            }
            Err(err) => {
                warn!("token refresh failed: {err}");
                if let Err(e) = self.store.clear().await {
                    warn!("could not clear session after failed refresh: {e}");
                }
                let _ = self.events.send(SessionEvent::Expired);
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        debug!(method = %request.method, path = %request.path, authenticated = token.is_some(), "sending request");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

/// Turn a status + body into the envelope's data or a classified error.
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> ApiResult<T> {
    let envelope: Option<Envelope<Value>> = serde_json::from_slice(body).ok();

    if !status.is_success() {
        return Err(status_error(status, envelope.as_ref()));
    }

    let envelope = envelope
        .ok_or_else(|| ApiError::Decode(format!("expected a JSON envelope (status {status})")))?;

    if !envelope.success {
        let message = non_empty(envelope.message.clone())
            .or_else(|| envelope.first_field_error())
            .unwrap_or_else(|| "Request failed".to_string());
        return Err(ApiError::Application {
            message,
            errors: envelope.errors,
        });
    }

    serde_json::from_value(envelope.data.unwrap_or(Value::Null)).map_err(ApiError::from)
}

fn status_error(status: StatusCode, envelope: Option<&Envelope<Value>>) -> ApiError {
    let message = envelope.and_then(|e| non_empty(e.message.clone()));
    match status.as_u16() {
        401 => ApiError::Unauthorized(message.unwrap_or_else(|| "Unauthorized".to_string())),
        403 => ApiError::Forbidden(message.unwrap_or_else(|| {
            "You do not have permission to perform this action.".to_string()
        })),
        422 => {
            let errors = envelope.and_then(|e| e.errors.clone());
            let message = errors
                .as_ref()
                .and_then(first_field_error)
                .or(message)
                .unwrap_or_else(|| "Please check your input and try again.".to_string());
            ApiError::Validation { message, errors }
        }
        429 => ApiError::RateLimited,
        s @ 500..=599 => ApiError::Server { status: s },
        s => ApiError::Http {
            status: s,
            message: message.unwrap_or_else(|| format!("Request failed with status {s}")),
        },
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
