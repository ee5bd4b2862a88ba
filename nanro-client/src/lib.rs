//! nanro-client: async HTTP client for the Nanro Bank API

pub mod api;
pub mod biometric;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod single_flight;

pub use api::transactions::MAX_PAGES;
pub use api::{AuthSession, LoginRequest, RegisterRequest};
pub use biometric::{BiometricSensor, SignatureOutcome};
pub use client::{ApiClient, ApiRequest, Method, RefreshCoordinator, decode_response};
pub use config::ClientConfig;
pub use error::{ApiError, ApiFailure, ApiResult, Notice, NoticeKind};
pub use notify::{Notifier, SessionEvent, TracingNotifier};
pub use session::{FileSessionStore, MemorySessionStore, SessionData, SessionStore};
pub use single_flight::{Joined, SingleFlight};
