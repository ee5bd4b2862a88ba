//! User-facing notices and session lifecycle events.

use crate::error::{Notice, NoticeKind};

/// Sink for toast/alert notices raised by failed requests.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default notifier: notices only go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Failure | NoticeKind::Connectivity => {
                tracing::warn!(kind = ?notice.kind, "{}", notice.message)
            }
            _ => tracing::info!(kind = ?notice.kind, "{}", notice.message),
        }
    }
}

/// Broadcast on the client's event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new bearer token replaced the old one
    Refreshed,
    /// Refresh failed; local session data has been wiped
    Expired,
}
