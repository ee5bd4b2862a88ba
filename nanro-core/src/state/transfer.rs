use crate::models::{Beneficiary, ResolvedAccount, TransferReceipt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferStatus {
    #[default]
    Idle,
    Resolving,
    Resolved,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferState {
    pub status: TransferStatus,
    pub recipient: Option<ResolvedAccount>,
    pub beneficiaries: Vec<Beneficiary>,
    pub receipt: Option<TransferReceipt>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransferAction {
    ResolveStarted,
    Resolved(ResolvedAccount),
    ResolveFailed(String),
    BeneficiariesLoaded(Vec<Beneficiary>),
    SubmitStarted,
    Succeeded(TransferReceipt),
    Failed(String),
    Reset,
}

impl TransferState {
    pub fn reduce(&mut self, action: TransferAction) {
        match action {
            TransferAction::ResolveStarted => {
                self.status = TransferStatus::Resolving;
                self.recipient = None;
                self.error = None;
            }
            TransferAction::Resolved(account) => {
                self.recipient = Some(account);
                self.status = TransferStatus::Resolved;
            }
            TransferAction::ResolveFailed(message) | TransferAction::Failed(message) => {
                self.status = TransferStatus::Failed;
                self.error = Some(message);
            }
            TransferAction::BeneficiariesLoaded(list) => self.beneficiaries = list,
            TransferAction::SubmitStarted => {
                // A second tap while submitting must not start another transfer
                if self.status != TransferStatus::Submitting {
                    self.status = TransferStatus::Submitting;
                    self.receipt = None;
                    self.error = None;
                }
            }
            TransferAction::Succeeded(receipt) => {
                self.receipt = Some(receipt);
                self.status = TransferStatus::Succeeded;
            }
            TransferAction::Reset => {
                let beneficiaries = std::mem::take(&mut self.beneficiaries);
                *self = TransferState {
                    beneficiaries,
                    ..TransferState::default()
                };
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == TransferStatus::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> ResolvedAccount {
        ResolvedAccount {
            account_name: "CHIOMA EZE".into(),
            account_number: "0011223344".into(),
            bank_code: Some("058".into()),
            bank_name: None,
        }
    }

    fn receipt() -> TransferReceipt {
        TransferReceipt {
            reference: "TRF-1".into(),
            amount: 5000.0,
            fee: 10.75,
            status: Some("successful".into()),
            created_at: None,
            balance_after: Some(1200.0),
        }
    }

    #[test]
    fn test_happy_path() {
        let mut s = TransferState::default();
        s.reduce(TransferAction::ResolveStarted);
        assert_eq!(s.status, TransferStatus::Resolving);
        s.reduce(TransferAction::Resolved(resolved()));
        assert_eq!(s.status, TransferStatus::Resolved);
        s.reduce(TransferAction::SubmitStarted);
        assert!(s.is_submitting());
        s.reduce(TransferAction::Succeeded(receipt()));
        assert_eq!(s.status, TransferStatus::Succeeded);
        assert_eq!(s.receipt.as_ref().unwrap().reference, "TRF-1");
    }

    #[test]
    fn test_double_submit_keeps_state() {
        let mut s = TransferState::default();
        s.reduce(TransferAction::SubmitStarted);
        s.reduce(TransferAction::SubmitStarted);
        assert!(s.is_submitting());
    }

    #[test]
    fn test_failure_and_reset_keeps_beneficiaries() {
        let mut s = TransferState::default();
        s.reduce(TransferAction::BeneficiariesLoaded(vec![Beneficiary {
            id: "b1".into(),
            account_name: "CHIOMA EZE".into(),
            account_number: "0011223344".into(),
            bank_name: None,
            bank_code: None,
        }]));
        s.reduce(TransferAction::SubmitStarted);
        s.reduce(TransferAction::Failed("Insufficient funds".into()));
        assert_eq!(s.status, TransferStatus::Failed);
        assert_eq!(s.error.as_deref(), Some("Insufficient funds"));

        s.reduce(TransferAction::Reset);
        assert_eq!(s.status, TransferStatus::Idle);
        assert!(s.error.is_none());
        assert_eq!(s.beneficiaries.len(), 1);
    }
}
