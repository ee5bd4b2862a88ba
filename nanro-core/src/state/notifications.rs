use crate::models::Notification;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationState {
    pub items: Vec<Notification>,
    pub unread_count: usize,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationAction {
    FetchStarted,
    Loaded(Vec<Notification>),
    FetchFailed(String),
    /// Pushed by the server outside a fetch; newest first
    Received(Notification),
    MarkedRead(String),
    MarkedAllRead,
}

impl NotificationState {
    pub fn reduce(&mut self, action: NotificationAction) {
        match action {
            NotificationAction::FetchStarted => {
                self.loading = true;
                self.error = None;
            }
            NotificationAction::Loaded(items) => {
                self.items = items;
                self.loading = false;
            }
            NotificationAction::FetchFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            NotificationAction::Received(n) => {
                self.items.retain(|existing| existing.id != n.id);
                self.items.insert(0, n);
            }
            NotificationAction::MarkedRead(id) => {
                if let Some(n) = self.items.iter_mut().find(|n| n.id == id) {
                    n.read = true;
                }
            }
            NotificationAction::MarkedAllRead => {
                for n in self.items.iter_mut() {
                    n.read = true;
                }
            }
        }
        self.unread_count = self.items.iter().filter(|n| !n.read).count();
    }
}
