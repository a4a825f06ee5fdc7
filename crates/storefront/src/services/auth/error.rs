//! Authentication error types.

use thiserror::Error;

use essenza_core::EmailError;

use crate::store::StoreError;

/// Errors from the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// No account matches this email.
    #[error("no account found")]
    UserNotFound,

    /// The email failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password does not meet the minimum requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Password and confirmation did not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A required registration field was empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The operation requires a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,

    /// The persisted store failed underneath the service.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
