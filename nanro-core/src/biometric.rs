//! Biometric login credential selection.

use serde::{Deserialize, Serialize};

/// What the device kept from biometric enrolment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BiometricCredentials {
    /// Signature captured and stored at enrolment time
    #[serde(default)]
    pub stored_signature: Option<String>,
    /// Public half of the device key registered with the backend
    #[serde(default)]
    pub public_key: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Pick the credential sent as the biometric login token.
///
/// Priority is stored signature, then the freshly computed signature, then
/// the public key. The backend currently accepts any of the three; the
/// ordering mirrors what the mobile client has always sent.
pub fn select_login_token(
    credentials: &BiometricCredentials,
    fresh_signature: Option<&str>,
) -> Option<String> {
    present(credentials.stored_signature.as_deref())
        .or_else(|| present(fresh_signature))
        .or_else(|| present(credentials.public_key.as_deref()))
        .map(str::to_string)
}

/// Payload signed by the device key: `<epoch seconds>|<identifier>`.
pub fn challenge_payload(epoch_secs: i64, identifier: &str) -> String {
    format!("{}|{}", epoch_secs, identifier)
}
