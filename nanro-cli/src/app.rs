use anyhow::{Context, Result};
use nanro_client::{ApiClient, FileSessionStore, SessionEvent};
use nanro_core::state::AuthAction;
use nanro_core::{AppState, RequestId};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::notify::CliNotifier;
use crate::state::session_path;

/// One command invocation: the client, the store it feeds, and config.
pub struct App {
    pub client: ApiClient,
    pub state: AppState,
    pub config: Config,
    next_request: RequestId,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let path = session_path()?;
        tracing::debug!(session = %path.display(), base_url = %config.api.base_url, "starting client");
        let store = Arc::new(FileSessionStore::new(path));
        let client = ApiClient::new(&config.client_config(), store)
            .context("create API client")?
            .with_notifier(Arc::new(CliNotifier));
        Ok(Self {
            client,
            state: AppState::new(),
            config,
            next_request: 0,
        })
    }

    pub fn request_id(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    /// Apply session events the client broadcast while the command ran.
    pub fn drain_session_events(&mut self, events: &mut broadcast::Receiver<SessionEvent>) {
        while let Ok(event) = events.try_recv() {
            if event == SessionEvent::Expired {
                self.state.dispatch(AuthAction::SessionExpired);
                eprintln!("Your session has expired. Run `nanro auth login` to sign in again.");
            }
        }
    }
}
