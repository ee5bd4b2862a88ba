use nanro_client::{Notice, NoticeKind, Notifier};

/// Prints notices to stderr, one line each.
pub struct CliNotifier;

impl Notifier for CliNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}: {}", label(notice.kind), notice.message);
    }
}

fn label(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Connectivity => "offline",
        NoticeKind::Authentication => "sign-in required",
        NoticeKind::PermissionDenied => "not allowed",
        NoticeKind::Validation => "check your input",
        NoticeKind::SlowDown => "slow down",
        NoticeKind::Failure => "error",
    }
}
