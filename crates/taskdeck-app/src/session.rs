//! Session lifecycle over an [`AuthProvider`].

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthProvider};

/// Authentication status observed by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Not yet determined.
    #[default]
    Undefined,
    /// A sign-in or sign-up is in flight.
    Loading,
    /// An identity is signed in.
    Active,
    /// Nobody is signed in.
    Inactive,
    /// The last attempt was refused with this message.
    AuthError(String),
}

/// Tracks whether a user is signed in and drives sign-in, sign-up, and sign-out.
pub struct SessionController<A> {
    provider: A,
    status: watch::Sender<SessionStatus>,
}

impl<A> SessionController<A>
where
    A: AuthProvider,
{
    /// Build the controller and resolve the initial status from the provider.
    pub fn new(provider: A) -> Self {
        let (status, _) = watch::channel(SessionStatus::Undefined);
        let controller = Self { provider, status };
        controller.check_session();
        controller
    }

    /// Re-read the provider's identity and settle on `Active` or `Inactive`.
    pub fn check_session(&self) {
        let next = if self.provider.current_identity().is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::Inactive
        };
        debug!(status = ?next, "Session checked");
        self.status.send_replace(next);
    }

    /// Borrow the provider.
    pub const fn provider(&self) -> &A {
        &self.provider
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    /// Observe every future status.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Email of the signed-in identity.
    pub fn current_user_email(&self) -> Option<String> {
        self.provider.current_identity().and_then(|identity| identity.email)
    }

    /// Display name of the signed-in identity, falling back to its email prefix.
    pub fn current_user_name(&self) -> Option<String> {
        self.provider
            .current_identity()
            .and_then(|identity| identity.display_name_or_email_prefix())
    }

    /// Sign in. Ends `Active` on success, `AuthError` otherwise.
    pub async fn login(&self, email: &str, password: &str) {
        self.status.send_replace(SessionStatus::Loading);
        let result = self.provider.sign_in(email, password).await;
        self.settle(result, "Login attempt failed");
    }

    /// Create an account and sign it in. Ends `Active` on success, `AuthError` otherwise.
    pub async fn create_account(&self, email: &str, password: &str) {
        self.status.send_replace(SessionStatus::Loading);
        let result = self.provider.sign_up(email, password).await;
        self.settle(result, "Account creation failed");
    }

    /// Sign out. Always ends `Inactive`.
    pub fn end_session(&self) {
        self.provider.sign_out();
        info!("Signed out");
        self.status.send_replace(SessionStatus::Inactive);
    }

    fn settle(&self, result: Result<(), AuthError>, fallback: &str) {
        let next = match result {
            Ok(()) => {
                info!(email = ?self.current_user_email(), "Session active");
                SessionStatus::Active
            }
            Err(err) => {
                warn!(error = %err, "Authentication refused");
                let message = if err.message().trim().is_empty() {
                    fallback.to_owned()
                } else {
                    err.message().to_owned()
                };
                SessionStatus::AuthError(message)
            }
        };
        self.status.send_replace(next);
    }
}
