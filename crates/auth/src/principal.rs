use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{PermissionToken, Role};

/// The authenticated party a decision is made for.
///
/// Supplied by the external identity provider and immutable for the duration
/// of a request. Permissions are kept ordered so two actors with the same
/// grants compare (and hash into caches) identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    role: Role,
    permissions: BTreeSet<PermissionToken>,
}

impl Actor {
    pub fn new(role: Role, permissions: impl IntoIterator<Item = PermissionToken>) -> Self {
        Self {
            role,
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Build an actor from raw identity-provider claims.
    ///
    /// An unrecognized role yields `None`: a malformed actor is treated
    /// exactly like an absent one and is denied everything.
    pub fn from_claims<S: AsRef<str>>(role: &str, permissions: &[S]) -> Option<Self> {
        let role = match role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                tracing::debug!(error = %e, "discarding actor with unrecognized role");
                return None;
            }
        };

        let permissions = permissions
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(|p| PermissionToken::new(p.to_string()));

        Some(Self::new(role, permissions))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &BTreeSet<PermissionToken> {
        &self.permissions
    }

    pub fn has_wildcard(&self) -> bool {
        self.permissions.iter().any(|p| p.is_wildcard())
    }

    /// Literal membership test (no wildcard expansion).
    pub fn holds(&self, token: &PermissionToken) -> bool {
        self.permissions.contains(token)
    }

    /// Whether the actor literally holds at least one of `tokens`.
    pub fn holds_any<'a>(&self, tokens: impl IntoIterator<Item = &'a PermissionToken>) -> bool {
        tokens.into_iter().any(|t| self.permissions.contains(t))
    }
}
