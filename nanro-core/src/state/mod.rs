//! Per-domain state containers.
//!
//! Each domain owns a plain struct plus an action enum and a `reduce`
//! method. [`AppState`] owns one of each and routes [`AppAction`]s; there is
//! no global mutable state.

pub mod account;
pub mod auth;
pub mod bills;
pub mod notifications;
pub mod transaction;
pub mod transfer;

pub use account::{AccountAction, AccountState};
pub use auth::{AuthAction, AuthState};
pub use bills::{BillsAction, BillsState, PaymentStatus};
pub use notifications::{NotificationAction, NotificationState};
pub use transaction::{TransactionAction, TransactionState};
pub use transfer::{TransferAction, TransferState, TransferStatus};

/// Identifies one outstanding fetch so late results can be dropped.
pub type RequestId = u64;

/// Tracks the most recent request of one kind.
///
/// A result is only applied when it answers the latest request; anything
/// older belongs to a caller that has moved on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latest(Option<RequestId>);

impl Latest {
    pub fn begin(&mut self, id: RequestId) {
        self.0 = Some(id);
    }

    /// True (and clears) when `id` is the outstanding request.
    pub fn finish(&mut self, id: RequestId) -> bool {
        if self.0 == Some(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Auth(AuthAction),
    Account(AccountAction),
    Transaction(TransactionAction),
    Transfer(TransferAction),
    Bills(BillsAction),
    Notification(NotificationAction),
}

impl From<AuthAction> for AppAction {
    fn from(a: AuthAction) -> Self {
        AppAction::Auth(a)
    }
}

impl From<AccountAction> for AppAction {
    fn from(a: AccountAction) -> Self {
        AppAction::Account(a)
    }
}

impl From<TransactionAction> for AppAction {
    fn from(a: TransactionAction) -> Self {
        AppAction::Transaction(a)
    }
}

impl From<TransferAction> for AppAction {
    fn from(a: TransferAction) -> Self {
        AppAction::Transfer(a)
    }
}

impl From<BillsAction> for AppAction {
    fn from(a: BillsAction) -> Self {
        AppAction::Bills(a)
    }
}

impl From<NotificationAction> for AppAction {
    fn from(a: NotificationAction) -> Self {
        AppAction::Notification(a)
    }
}

/// The whole client-side store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub account: AccountState,
    pub transactions: TransactionState,
    pub transfer: TransferState,
    pub bills: BillsState,
    pub notifications: NotificationState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self, action: impl Into<AppAction>) {
        match action.into() {
            AppAction::Auth(a) => {
                let ends_session = matches!(a, AuthAction::LoggedOut | AuthAction::SessionExpired);
                self.auth.reduce(a);
                if ends_session {
                    self.clear_session_data();
                }
            }
            AppAction::Account(a) => self.account.reduce(a),
            AppAction::Transaction(a) => self.transactions.reduce(a),
            AppAction::Transfer(a) => self.transfer.reduce(a),
            AppAction::Bills(a) => self.bills.reduce(a),
            AppAction::Notification(a) => self.notifications.reduce(a),
        }
    }

    /// Drop everything that belonged to the signed-in user.
    fn clear_session_data(&mut self) {
        self.account = AccountState::default();
        self.transactions = TransactionState::default();
        self.transfer = TransferState::default();
        self.bills = BillsState::default();
        self.notifications = NotificationState::default();
    }
}
