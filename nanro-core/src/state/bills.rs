use std::collections::HashMap;

use crate::models::{BillCategory, BillPaymentReceipt, Biller};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Idle,
    Paying,
    Paid,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BillsState {
    pub categories: Vec<BillCategory>,
    /// Billers keyed by category id
    pub billers: HashMap<String, Vec<Biller>>,
    pub payment: PaymentStatus,
    pub last_receipt: Option<BillPaymentReceipt>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillsAction {
    CategoriesLoaded(Vec<BillCategory>),
    BillersLoaded { category: String, billers: Vec<Biller> },
    LoadFailed(String),
    PaymentStarted,
    PaymentSucceeded(BillPaymentReceipt),
    PaymentFailed(String),
    Reset,
}

impl BillsState {
    pub fn reduce(&mut self, action: BillsAction) {
        match action {
            BillsAction::CategoriesLoaded(categories) => {
                self.categories = categories;
                self.error = None;
            }
            BillsAction::BillersLoaded { category, billers } => {
                self.billers.insert(category, billers);
                self.error = None;
            }
            BillsAction::LoadFailed(message) => self.error = Some(message),
            BillsAction::PaymentStarted => {
                self.payment = PaymentStatus::Paying;
                self.last_receipt = None;
                self.error = None;
            }
            BillsAction::PaymentSucceeded(receipt) => {
                self.payment = PaymentStatus::Paid;
                self.last_receipt = Some(receipt);
            }
            BillsAction::PaymentFailed(message) => {
                self.payment = PaymentStatus::Failed;
                self.error = Some(message);
            }
            BillsAction::Reset => {
                self.payment = PaymentStatus::Idle;
                self.last_receipt = None;
                self.error = None;
            }
        }
    }

    pub fn billers_for(&self, category: &str) -> &[Biller] {
        self.billers.get(category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billers_cached_per_category() {
        let mut s = BillsState::default();
        s.reduce(BillsAction::BillersLoaded {
            category: "electricity".into(),
            billers: vec![Biller {
                id: "ikedc".into(),
                name: "Ikeja Electric".into(),
                category: Some("electricity".into()),
                fee: 100.0,
            }],
        });
        assert_eq!(s.billers_for("electricity").len(), 1);
        assert!(s.billers_for("airtime").is_empty());
    }

    #[test]
    fn test_payment_flow() {
        let mut s = BillsState::default();
        s.reduce(BillsAction::PaymentStarted);
        assert_eq!(s.payment, PaymentStatus::Paying);
        s.reduce(BillsAction::PaymentSucceeded(BillPaymentReceipt {
            reference: "BIL-9".into(),
            amount: 2000.0,
            status: Some("successful".into()),
            token: Some("1234-5678-9012".into()),
            created_at: None,
        }));
        assert_eq!(s.payment, PaymentStatus::Paid);
        assert_eq!(s.last_receipt.as_ref().unwrap().token.as_deref(), Some("1234-5678-9012"));

        s.reduce(BillsAction::PaymentStarted);
        s.reduce(BillsAction::PaymentFailed("Biller unavailable".into()));
        assert_eq!(s.payment, PaymentStatus::Failed);
        assert!(s.last_receipt.is_none());
    }
}
