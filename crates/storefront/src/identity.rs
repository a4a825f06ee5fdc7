//! Identity scoping for persisted collections.
//!
//! Every cart and wishlist belongs to exactly one identity scope: the
//! anonymous guest session or an identified user keyed by email. The scope
//! is only ever changed through a container's `bind_scope`, which reloads
//! the newly scoped persisted copy (or resets to empty). Scopes are never
//! merged: items added while anonymous stay under the guest key.

use essenza_core::Email;
use serde::{Deserialize, Serialize};

/// The identity scope a working set is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "email", rename_all = "snake_case")]
pub enum IdentityScope {
    /// No logged-in user; collections live under the guest keys.
    #[default]
    Anonymous,
    /// Logged-in user; collections live under email-suffixed keys.
    Identified(Email),
}

impl IdentityScope {
    /// The key suffix this scope's collections are stored under.
    #[must_use]
    pub fn storage_suffix(&self) -> &str {
        match self {
            Self::Anonymous => "guest",
            Self::Identified(email) => email.as_str(),
        }
    }

    /// Whether a user is logged in under this scope.
    #[must_use]
    pub const fn is_identified(&self) -> bool {
        matches!(self, Self::Identified(_))
    }
}

impl std::fmt::Display for IdentityScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Identified(email) => write!(f, "identified({email})"),
        }
    }
}
