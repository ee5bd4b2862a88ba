//! Login, registration, biometric login and session teardown.

use chrono::Utc;
use nanro_core::{BiometricCredentials, User, challenge_payload, select_login_token};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::biometric::{BiometricSensor, SignatureOutcome};
use crate::client::{ApiClient, ApiRequest, BIOMETRIC_LOGIN_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::error::{ApiError, ApiResult};

pub const LOGOUT_PATH: &str = "/auth/logout";
pub const PROFILE_PATH: &str = "/auth/profile";
pub const BIOMETRIC_ENABLE_PATH: &str = "/auth/biometric/enable";
pub const BIOMETRIC_DISABLE_PATH: &str = "/auth/biometric/disable";

const BIOMETRIC_PROMPT: &str = "Confirm your identity to sign in";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password_confirmation: String,
}

/// What a successful login hands back
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthSession {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl ApiClient {
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthSession> {
        let session: AuthSession = self
            .send(ApiRequest::post(LOGIN_PATH).json(request)?)
            .await?;
        self.persist_session(&session).await?;
        info!("logged in");
        Ok(session)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthSession> {
        let session: AuthSession = self
            .send(ApiRequest::post(REGISTER_PATH).json(request)?)
            .await?;
        self.persist_session(&session).await?;
        info!("registered and logged in");
        Ok(session)
    }

    /// Sign a fresh challenge with the device key and exchange the
    /// resulting credential for a session.
    pub async fn biometric_login(
        &self,
        sensor: &dyn BiometricSensor,
        credentials: &BiometricCredentials,
        identifier: &str,
    ) -> ApiResult<AuthSession> {
        if !sensor.is_available().await? {
            return Err(ApiError::Application {
                message: "Biometric authentication is not available on this device".into(),
                errors: None,
            });
        }

        let payload = challenge_payload(Utc::now().timestamp(), identifier);
        let signature = match sensor.sign(BIOMETRIC_PROMPT, &payload).await? {
            SignatureOutcome::Signed(signature) => signature,
            SignatureOutcome::Cancelled => return Err(ApiError::Cancelled),
        };

        let token = select_login_token(credentials, Some(&signature)).ok_or_else(|| {
            ApiError::Application {
                message: "No biometric credential is enrolled on this device".into(),
                errors: None,
            }
        })?;

        let body = json!({ "email": identifier, "signature": token, "payload": payload });
        let session: AuthSession = self
            .send(ApiRequest::post(BIOMETRIC_LOGIN_PATH).json(&body)?)
            .await?;
        self.persist_session(&session).await?;
        info!("logged in with biometrics");
        Ok(session)
    }

    /// Create a device key and register its public half for this account.
    pub async fn enable_biometrics(
        &self,
        sensor: &dyn BiometricSensor,
    ) -> ApiResult<BiometricCredentials> {
        let public_key = sensor.create_keys().await?;
        let body = json!({ "public_key": public_key });
        self.send::<serde_json::Value>(ApiRequest::post(BIOMETRIC_ENABLE_PATH).json(&body)?)
            .await?;
        Ok(BiometricCredentials {
            stored_signature: None,
            public_key: Some(public_key),
        })
    }

    pub async fn disable_biometrics(&self, sensor: &dyn BiometricSensor) -> ApiResult<()> {
        self.send::<serde_json::Value>(ApiRequest::post(BIOMETRIC_DISABLE_PATH))
            .await?;
        sensor.delete_keys().await
    }

    /// Tell the server, then wipe the local session whatever it said.
    pub async fn logout(&self) -> ApiResult<()> {
        if let Err(err) = self
            .send_quiet::<serde_json::Value>(ApiRequest::post(LOGOUT_PATH))
            .await
        {
            warn!("server logout failed, clearing local session anyway: {err}");
        }
        self.store().clear().await?;
        info!("logged out");
        Ok(())
    }

    pub async fn profile(&self) -> ApiResult<User> {
        let user: User = self.send(ApiRequest::get(PROFILE_PATH)).await?;
        self.store().set_user(&user).await?;
        Ok(user)
    }

    async fn persist_session(&self, session: &AuthSession) -> ApiResult<()> {
        self.store().set_token(&session.token).await?;
        match &session.user {
            Some(user) => self.store().set_user(user).await,
            None => self.store().remove_user().await,
        }
    }
}
