//! Port to the device biometric sensor.
//!
//! The platform binding lives outside this crate; the client only needs a
//! yes/no availability answer, a key pair whose public half can be
//! registered, and a signature (or a cancel) for a challenge.

use async_trait::async_trait;

use crate::error::ApiResult;

/// Result of prompting the user to sign a challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureOutcome {
    Signed(String),
    /// The user dismissed the prompt
    Cancelled,
}

#[async_trait]
pub trait BiometricSensor: Send + Sync {
    async fn is_available(&self) -> ApiResult<bool>;

    /// Create (or replace) the device key pair and return the public key.
    async fn create_keys(&self) -> ApiResult<String>;

    async fn delete_keys(&self) -> ApiResult<()>;

    async fn sign(&self, prompt: &str, payload: &str) -> ApiResult<SignatureOutcome>;
}
