//! nanro-core: domain types, lenient API decoding and client-side state for Nanro Bank

pub mod amount;
pub mod biometric;
pub mod envelope;
pub mod models;
pub mod state;
pub mod time;

pub use amount::{coerce_amount, lenient_f64, lenient_opt_f64, parse_amount_str};
pub use biometric::{BiometricCredentials, challenge_payload, select_login_token};
pub use envelope::{Envelope, first_field_error};
pub use models::{
    Account, Balance, Beneficiary, BillCategory, BillPaymentReceipt, BillPaymentRequest, Biller,
    Notification, Page, ResolvedAccount, Transaction, TransactionKind, TransferReceipt,
    TransferRequest, User,
};
pub use state::{AppAction, AppState, RequestId};
pub use time::{DEFAULT_TIMEZONE, epoch_millis, format_in_zone, parse_timestamp, parse_timezone};
