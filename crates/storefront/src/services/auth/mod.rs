//! Authentication service.
//!
//! Registration, login, and session state over the persisted store. The
//! registered-user directory lives under `perfume_users`; the active session
//! is the `perfume_user` profile record plus its `token`/`user` mirror keys.
//!
//! Credentials are compared as plain strings against the stored directory,
//! matching the storage contract this layer stands in for. The directory is
//! a local stand-in database, not a hardened credential store.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use essenza_core::Email;

use crate::notify::{NoticeLevel, Notifier};
use crate::store::{KeyValueStore, keys, read_json, write_json};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// A user's public profile (no credential material).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account email; also the identity-scope key for collections.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

/// A directory entry: profile plus stored password.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    email: Email,
    name: String,
    phone: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn profile(&self) -> UserProfile {
        UserProfile {
            email: self.email.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
            created_at: self.created_at,
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// An active login session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token, regenerated on every login.
    pub token: String,
    /// The logged-in user's profile.
    pub user: UserProfile,
}

/// Authentication service over the persisted store.
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Register a new user.
    ///
    /// Validation happens before any mutation: required fields, email shape,
    /// password length and confirmation. The new account is appended to the
    /// directory; registration does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for empty required fields,
    /// `AuthError::InvalidEmail` / `AuthError::WeakPassword` /
    /// `AuthError::PasswordMismatch` for invalid input, and
    /// `AuthError::UserAlreadyExists` for a duplicate email.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub fn register(&self, form: &NewUser) -> Result<UserProfile, AuthError> {
        if form.name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if form.phone.trim().is_empty() {
            return Err(AuthError::MissingField("phone"));
        }
        let email = Email::parse(form.email.trim())?;
        validate_password(&form.password)?;
        if form.password != form.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let mut directory = self.directory()?;
        if directory.iter().any(|record| record.email == email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let record = UserRecord {
            email,
            name: form.name.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            password: form.password.clone(),
            created_at: Utc::now(),
        };
        let profile = record.profile();
        directory.push(record);
        write_json(self.store.as_ref(), keys::USERS, &directory)?;

        self.notifier
            .notify(NoticeLevel::Success, "account created, please log in");
        Ok(profile)
    }

    /// Log in with email and password.
    ///
    /// On success the session is written under `perfume_user` with its
    /// `token`/`user` mirror keys, and a fresh token is generated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the email is unknown or
    /// the password does not match (indistinguishable on purpose).
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email.trim())?;
        let directory = self.directory()?;
        let record = directory
            .iter()
            .find(|record| record.email == email && record.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user: record.profile(),
        };

        write_json(self.store.as_ref(), keys::CURRENT_USER, &session.user)?;
        self.store.set(keys::TOKEN, &session.token)?;
        write_json(self.store.as_ref(), keys::SESSION_USER, &session.user)?;

        self.notifier.notify(
            NoticeLevel::Success,
            &format!("welcome back, {}", session.user.name),
        );
        Ok(session)
    }

    /// Log out: remove the session keys.
    ///
    /// Container scopes must be rebound to `Anonymous` by the caller; this
    /// service only owns the session keys.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the store fails.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.remove(keys::CURRENT_USER)?;
        self.store.remove(keys::TOKEN)?;
        self.store.remove(keys::SESSION_USER)?;
        self.notifier.notify(NoticeLevel::Info, "logged out");
        Ok(())
    }

    /// The currently logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` on read or parse failure.
    pub fn current_user(&self) -> Result<Option<UserProfile>, AuthError> {
        Ok(read_json(self.store.as_ref(), keys::CURRENT_USER)?)
    }

    /// Update the logged-in user's name and phone.
    ///
    /// Rewrites the directory entry and refreshes the session keys.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session and
    /// `AuthError::UserNotFound` if the directory entry is gone.
    #[instrument(skip(self))]
    pub fn update_profile(&self, name: &str, phone: &str) -> Result<UserProfile, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        let current = self.current_user()?.ok_or(AuthError::NotLoggedIn)?;

        let mut directory = self.directory()?;
        let record = directory
            .iter_mut()
            .find(|record| record.email == current.email)
            .ok_or(AuthError::UserNotFound)?;
        record.name = name.trim().to_owned();
        record.phone = phone.trim().to_owned();
        let profile = record.profile();

        write_json(self.store.as_ref(), keys::USERS, &directory)?;
        write_json(self.store.as_ref(), keys::CURRENT_USER, &profile)?;
        write_json(self.store.as_ref(), keys::SESSION_USER, &profile)?;

        self.notifier.notify(NoticeLevel::Success, "profile updated");
        Ok(profile)
    }

    fn directory(&self) -> Result<Vec<UserRecord>, AuthError> {
        Ok(read_json(self.store.as_ref(), keys::USERS)?.unwrap_or_default())
    }
}

/// Validate that a password meets the minimum requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::store::MemoryStore;

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AuthService::new(store.clone(), Arc::new(RecordingNotifier::new()));
        (service, store)
    }

    fn form(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_owned(),
            email: email.to_owned(),
            phone: "5550100".to_owned(),
            password: "hunter22".to_owned(),
            confirm_password: "hunter22".to_owned(),
        }
    }

    #[test]
    fn test_register_then_login() {
        let (service, store) = service();
        service.register(&form("ada@x.com")).unwrap();

        // registration alone does not create a session
        assert!(service.current_user().unwrap().is_none());

        let session = service.login("ada@x.com", "hunter22").unwrap();
        assert_eq!(session.user.email.as_str(), "ada@x.com");
        assert!(!session.token.is_empty());

        // session keys are written
        assert!(store.get(keys::CURRENT_USER).unwrap().is_some());
        assert!(store.get(keys::TOKEN).unwrap().is_some());
        assert!(store.get(keys::SESSION_USER).unwrap().is_some());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (service, _store) = service();
        service.register(&form("ada@x.com")).unwrap();
        assert!(matches!(
            service.register(&form("ada@x.com")),
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_validation_happens_before_mutation() {
        let (service, store) = service();

        let mut bad = form("ada@x.com");
        bad.confirm_password = "different".to_owned();
        assert!(matches!(
            service.register(&bad),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(store.get(keys::USERS).unwrap().is_none());

        let mut short = form("ada@x.com");
        short.password = "abc".to_owned();
        short.confirm_password = "abc".to_owned();
        assert!(matches!(
            service.register(&short),
            Err(AuthError::WeakPassword(_))
        ));

        let mut nameless = form("ada@x.com");
        nameless.name = "  ".to_owned();
        assert!(matches!(
            service.register(&nameless),
            Err(AuthError::MissingField("name"))
        ));
    }

    #[test]
    fn test_wrong_password_is_invalid_credentials() {
        let (service, _store) = service();
        service.register(&form("ada@x.com")).unwrap();

        assert!(matches!(
            service.login("ada@x.com", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@x.com", "hunter22"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_logout_clears_session_keys() {
        let (service, store) = service();
        service.register(&form("ada@x.com")).unwrap();
        service.login("ada@x.com", "hunter22").unwrap();

        service.logout().unwrap();
        assert!(store.get(keys::CURRENT_USER).unwrap().is_none());
        assert!(store.get(keys::TOKEN).unwrap().is_none());
        assert!(store.get(keys::SESSION_USER).unwrap().is_none());
        assert!(service.current_user().unwrap().is_none());
    }

    #[test]
    fn test_update_profile_requires_login() {
        let (service, _store) = service();
        service.register(&form("ada@x.com")).unwrap();
        assert!(matches!(
            service.update_profile("Ada L", "5550101"),
            Err(AuthError::NotLoggedIn)
        ));

        service.login("ada@x.com", "hunter22").unwrap();
        let profile = service.update_profile("Ada L", "5550101").unwrap();
        assert_eq!(profile.name, "Ada L");
        assert_eq!(
            service.current_user().unwrap().unwrap().name,
            "Ada L"
        );
    }
}
