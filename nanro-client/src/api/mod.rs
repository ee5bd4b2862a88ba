//! Typed endpoint wrappers, one module per domain. Each adds methods to
//! [`crate::ApiClient`].

pub mod accounts;
pub mod auth;
pub mod bills;
pub mod notifications;
pub mod transactions;
pub mod transfers;

pub use auth::{AuthSession, LoginRequest, RegisterRequest};
