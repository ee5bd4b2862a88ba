use super::{Latest, RequestId};
use crate::models::{Account, Balance};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountState {
    pub balance: Option<Balance>,
    pub accounts: Vec<Account>,
    pub error: Option<String>,
    balance_request: Latest,
    accounts_request: Latest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountAction {
    BalanceRequested(RequestId),
    BalanceLoaded(RequestId, Balance),
    BalanceFailed(RequestId, String),
    AccountsRequested(RequestId),
    AccountsLoaded(RequestId, Vec<Account>),
    AccountsFailed(RequestId, String),
}

impl AccountState {
    pub fn loading(&self) -> bool {
        self.balance_request.is_pending() || self.accounts_request.is_pending()
    }

    pub fn reduce(&mut self, action: AccountAction) {
        match action {
            AccountAction::BalanceRequested(id) => {
                self.balance_request.begin(id);
                self.error = None;
            }
            AccountAction::BalanceLoaded(id, balance) => {
                if self.balance_request.finish(id) {
                    self.balance = Some(balance);
                }
            }
            AccountAction::BalanceFailed(id, message) => {
                if self.balance_request.finish(id) {
                    self.error = Some(message);
                }
            }
            AccountAction::AccountsRequested(id) => {
                self.accounts_request.begin(id);
                self.error = None;
            }
            AccountAction::AccountsLoaded(id, accounts) => {
                if self.accounts_request.finish(id) {
                    self.accounts = accounts;
                }
            }
            AccountAction::AccountsFailed(id, message) => {
                if self.accounts_request.finish(id) {
                    self.error = Some(message);
                }
            }
        }
    }
}
