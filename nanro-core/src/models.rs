//! Wire models for the banking API.
//!
//! Monetary fields go through the lenient amount helpers, identifiers
//! through [`lenient_string`], because the backend mixes numbers and
//! strings freely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::amount::{lenient_f64, lenient_opt_f64};
use crate::time::parse_timestamp;

/// Accept strings, numbers or null for text-ish fields.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Like [`lenient_string`] but null and empty values stay absent.
pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Any `type` value decodes; null, non-strings and unrecognised names
/// become [`TransactionKind::Unknown`].
pub fn lenient_kind<'de, D>(deserializer: D) -> Result<TransactionKind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => TransactionKind::parse(&s),
        _ => TransactionKind::Unknown,
    })
}

/// Transaction type as reported by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
    Transfer,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TransactionKind {
    /// Case-insensitive; anything unrecognised is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "credit" => TransactionKind::Credit,
            "debit" => TransactionKind::Debit,
            "transfer" => TransactionKind::Transfer,
            _ => TransactionKind::Unknown,
        }
    }

    /// Money in, from the statement owner's point of view.
    pub fn counts_as_credit(&self) -> bool {
        matches!(self, TransactionKind::Credit)
    }

    /// Money out. Transfers are always treated as outbound.
    pub fn counts_as_debit(&self) -> bool {
        matches!(self, TransactionKind::Debit | TransactionKind::Transfer)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
            TransactionKind::Transfer => "transfer",
            TransactionKind::Unknown => "unknown",
        }
    }
}

/// A ledger entry as returned by the transactions endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: TransactionKind,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance_after: f64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
}

impl Transaction {
    pub fn new(
        id: impl Into<String>,
        kind: TransactionKind,
        amount: f64,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            created_at: created_at.into(),
            reference: String::new(),
            description: String::new(),
            balance_after: 0.0,
            status: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_balance_after(mut self, balance_after: f64) -> Self {
        self.balance_after = balance_after;
        self
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub kyc_status: Option<String>,
    #[serde(default)]
    pub biometric_enabled: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if parts.is_empty() {
            self.email.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_name: String,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    #[serde(alias = "balance", default, deserialize_with = "lenient_f64")]
    pub available_balance: f64,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub ledger_balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Beneficiary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: String,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
}

/// Result of a name enquiry on a destination account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedAccount {
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: String,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRequest {
    pub recipient_account_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    pub pin: String,
    #[serde(default)]
    pub save_beneficiary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferReceipt {
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fee: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub balance_after: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillCategory {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Biller {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fee: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillPaymentRequest {
    pub biller_id: String,
    pub customer_id: String,
    pub amount: f64,
    pub pin: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillPaymentReceipt {
    #[serde(default, deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub status: Option<String>,
    /// Prepaid meter token, airtime PIN, etc.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(alias = "message", default, deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(alias = "is_read", default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(alias = "data", alias = "transactions", alias = "notifications")]
    pub items: Vec<T>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub total: Option<u64>,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}
