//! Authentication provider boundary.

use std::sync::Arc;

use taskdeck_core::UserId;
use thiserror::Error;

/// The signed-in account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account id; owner of the account's tasks.
    pub id: UserId,
    /// Sign-in email, when known.
    pub email: Option<String>,
    /// Human-readable name, when set.
    pub display_name: Option<String>,
}

impl Identity {
    /// Display name if non-empty, otherwise the part of the email before `@`.
    #[must_use]
    pub fn display_name_or_email_prefix(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map(str::to_owned)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|prefix| !prefix.is_empty())
                    .map(str::to_owned)
            })
    }
}

/// Failure reported by the provider during sign-in or sign-up.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    message: String,
}

impl AuthError {
    /// Wrap a provider message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Provider message shown to the user.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Source of the authenticated identity.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    /// The signed-in identity, if any. Never suspends.
    fn current_identity(&self) -> Option<Identity>;

    /// Sign in with email and password.
    ///
    /// # Errors
    /// Returns [`AuthError`] with the provider's message when sign-in is refused.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Create an account and sign it in.
    ///
    /// # Errors
    /// Returns [`AuthError`] with the provider's message when sign-up is refused.
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Forget the signed-in identity.
    fn sign_out(&self);
}

impl<A> AuthProvider for Arc<A>
where
    A: AuthProvider + ?Sized,
{
    fn current_identity(&self) -> Option<Identity> {
        (**self).current_identity()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        (**self).sign_in(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), AuthError> {
        (**self).sign_up(email, password).await
    }

    fn sign_out(&self) {
        (**self).sign_out();
    }
}
