//! Error taxonomy for API calls and the user-facing notice each one maps to.

use serde::Serialize;
use serde_json::Value;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiError {
    // Transport
    #[error("No internet connection")]
    Offline,

    #[error("Request timed out")]
    Timeout,

    // Authentication
    #[error("{0}")]
    Unauthorized(String),

    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    // Status classes
    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Validation { message: String, errors: Option<Value> },

    #[error("Too many requests. Please slow down and try again shortly.")]
    RateLimited,

    #[error("Server error ({status}). Please try again later.")]
    Server { status: u16 },

    #[error("{message}")]
    Http { status: u16, message: String },

    // `success: false` inside a 2xx envelope
    #[error("{message}")]
    Application { message: String, errors: Option<Value> },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    /// The user dismissed a prompt (biometric, share sheet)
    #[error("Cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::Decode(error.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Storage(error.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_connect() || error.is_request() {
            ApiError::Offline
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Offline
        }
    }
}

impl ApiError {
    pub fn errors(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { errors, .. } | ApiError::Application { errors, .. } => {
                errors.as_ref()
            }
            _ => None,
        }
    }

    /// The toast/alert this error should raise, if any.
    ///
    /// Cancellation is an expected outcome and session expiry is announced
    /// through [`crate::SessionEvent::Expired`], so neither raises a notice.
    pub fn notice(&self) -> Option<Notice> {
        let kind = match self {
            ApiError::Cancelled | ApiError::SessionExpired => return None,
            ApiError::Offline | ApiError::Timeout => NoticeKind::Connectivity,
            ApiError::Unauthorized(_) => NoticeKind::Authentication,
            ApiError::Forbidden(_) => NoticeKind::PermissionDenied,
            ApiError::Validation { .. } | ApiError::Application { .. } => NoticeKind::Validation,
            ApiError::RateLimited => NoticeKind::SlowDown,
            ApiError::Server { .. }
            | ApiError::Http { .. }
            | ApiError::Decode(_)
            | ApiError::Storage(_) => NoticeKind::Failure,
        };
        Some(Notice {
            kind,
            message: self.to_string(),
        })
    }

    pub fn to_failure(&self) -> ApiFailure {
        ApiFailure {
            success: false,
            message: self.to_string(),
            errors: self.errors().cloned(),
        }
    }
}

/// Uniform failure value handed to callers instead of a panic
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

impl From<&ApiError> for ApiFailure {
    fn from(error: &ApiError) -> Self {
        error.to_failure()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Connectivity,
    Authentication,
    PermissionDenied,
    Validation,
    SlowDown,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_class_maps_to_one_notice() {
        let cases = vec![
            (ApiError::Offline, Some(NoticeKind::Connectivity)),
            (ApiError::Timeout, Some(NoticeKind::Connectivity)),
            (ApiError::Unauthorized("bad".into()), Some(NoticeKind::Authentication)),
            (ApiError::Forbidden("no".into()), Some(NoticeKind::PermissionDenied)),
            (
                ApiError::Validation {
                    message: "Amount is required".into(),
                    errors: None,
                },
                Some(NoticeKind::Validation),
            ),
            (ApiError::RateLimited, Some(NoticeKind::SlowDown)),
            (ApiError::Server { status: 503 }, Some(NoticeKind::Failure)),
            (ApiError::SessionExpired, None),
            (ApiError::Cancelled, None),
        ];
        for (err, kind) in cases {
            assert_eq!(err.notice().map(|n| n.kind), kind, "{err:?}");
        }
    }

    #[test]
    fn test_failure_shape() {
        let err = ApiError::Validation {
            message: "The pin field is required.".into(),
            errors: Some(json!({"pin": ["The pin field is required."]})),
        };
        let value = serde_json::to_value(err.to_failure()).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "The pin field is required.");
        assert_eq!(value["errors"]["pin"][0], "The pin field is required.");

        let value = serde_json::to_value(ApiFailure::from(&ApiError::Timeout)).unwrap();
        assert!(value.get("errors").is_none());
    }
}
