use crate::models::User;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub biometric_enabled: bool,
    /// Set when the session ended because a token refresh failed
    pub session_expired: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    LoginStarted,
    LoggedIn { user: User },
    LoginFailed(String),
    ProfileLoaded(User),
    BiometricToggled(bool),
    LoggedOut,
    SessionExpired,
    ClearError,
}

impl AuthState {
    pub fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::LoginStarted => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::LoggedIn { user } => {
                self.biometric_enabled = user.biometric_enabled;
                self.user = Some(user);
                self.is_authenticated = true;
                self.loading = false;
                self.error = None;
                self.session_expired = false;
            }
            AuthAction::LoginFailed(message) => {
                self.loading = false;
                self.is_authenticated = false;
                self.error = Some(message);
            }
            AuthAction::ProfileLoaded(user) => {
                self.biometric_enabled = user.biometric_enabled;
                self.user = Some(user);
            }
            AuthAction::BiometricToggled(enabled) => {
                self.biometric_enabled = enabled;
                if let Some(user) = self.user.as_mut() {
                    user.biometric_enabled = enabled;
                }
            }
            AuthAction::LoggedOut => {
                *self = AuthState::default();
            }
            AuthAction::SessionExpired => {
                *self = AuthState {
                    session_expired: true,
                    ..AuthState::default()
                };
            }
            AuthAction::ClearError => self.error = None,
        }
    }
}
