use std::collections::HashSet;

use super::{Latest, RequestId};
use crate::models::{Page, Transaction};

/// Paged transaction history
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionState {
    pub items: Vec<Transaction>,
    pub page: u32,
    pub has_more: bool,
    pub error: Option<String>,
    request: Latest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionAction {
    PageRequested(RequestId),
    PageLoaded(RequestId, Page<Transaction>),
    PageFailed(RequestId, String),
    Clear,
}

impl TransactionState {
    pub fn loading(&self) -> bool {
        self.request.is_pending()
    }

    /// Page to ask for next when scrolling.
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    pub fn reduce(&mut self, action: TransactionAction) {
        match action {
            TransactionAction::PageRequested(id) => {
                self.request.begin(id);
                self.error = None;
            }
            TransactionAction::PageLoaded(id, page) => {
                if !self.request.finish(id) {
                    return;
                }
                self.has_more = page.has_more();
                if page.current_page <= 1 {
                    self.items = page.items;
                } else {
                    self.append(page.items);
                }
                self.page = page.current_page;
            }
            TransactionAction::PageFailed(id, message) => {
                if self.request.finish(id) {
                    self.error = Some(message);
                }
            }
            TransactionAction::Clear => *self = TransactionState::default(),
        }
    }

    // Pages can overlap when new transactions land between fetches.
    fn append(&mut self, incoming: Vec<Transaction>) {
        let mut seen: HashSet<String> = self
            .items
            .iter()
            .filter(|t| !t.id.is_empty())
            .map(|t| t.id.clone())
            .collect();
        for t in incoming {
            if t.id.is_empty() || seen.insert(t.id.clone()) {
                self.items.push(t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    fn page(current: u32, last: u32, ids: &[&str]) -> Page<Transaction> {
        Page {
            items: ids
                .iter()
                .map(|id| Transaction::new(*id, TransactionKind::Debit, 10.0, "2026-01-01"))
                .collect(),
            current_page: current,
            last_page: last,
            total: None,
        }
    }

    fn ids(s: &TransactionState) -> Vec<&str> {
        s.items.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_first_page_replaces() {
        let mut s = TransactionState::default();
        s.reduce(TransactionAction::PageRequested(1));
        s.reduce(TransactionAction::PageLoaded(1, page(1, 2, &["a", "b"])));
        s.reduce(TransactionAction::PageRequested(2));
        s.reduce(TransactionAction::PageLoaded(2, page(1, 2, &["c"])));
        assert_eq!(ids(&s), vec!["c"]);
        assert!(s.has_more);
        assert_eq!(s.next_page(), 2);
    }

    #[test]
    fn test_append_drops_overlap() {
        let mut s = TransactionState::default();
        s.reduce(TransactionAction::PageRequested(1));
        s.reduce(TransactionAction::PageLoaded(1, page(1, 2, &["a", "b"])));
        s.reduce(TransactionAction::PageRequested(2));
        s.reduce(TransactionAction::PageLoaded(2, page(2, 2, &["b", "c"])));
        assert_eq!(ids(&s), vec!["a", "b", "c"]);
        assert!(!s.has_more);
        assert_eq!(s.page, 2);
    }

    #[test]
    fn test_stale_page_ignored() {
        let mut s = TransactionState::default();
        s.reduce(TransactionAction::PageRequested(1));
        s.reduce(TransactionAction::Clear);
        s.reduce(TransactionAction::PageLoaded(1, page(1, 1, &["x"])));
        assert!(s.items.is_empty());
        assert!(!s.loading());
    }
}
