use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Actor, PermissionToken, Role};

/// Route requirement attached to a [`ModuleKey`](medierp_core::ModuleKey).
///
/// An empty set means "no restriction" in that dimension. When both sets are
/// non-empty an actor must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAccessRule {
    pub required_roles: BTreeSet<Role>,
    pub required_permissions: BTreeSet<PermissionToken>,
}

impl ModuleAccessRule {
    pub fn new(
        roles: impl IntoIterator<Item = Role>,
        permissions: impl IntoIterator<Item = PermissionToken>,
    ) -> Self {
        Self {
            required_roles: roles.into_iter().collect(),
            required_permissions: permissions.into_iter().collect(),
        }
    }

    /// A rule that admits every actor.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn role_satisfied(&self, role: Role) -> bool {
        self.required_roles.is_empty() || self.required_roles.contains(&role)
    }

    /// Non-empty intersection between the actor's grants and the requirement.
    pub fn permission_satisfied(&self, actor: &Actor) -> bool {
        self.required_permissions.is_empty() || actor.holds_any(&self.required_permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::tokens;

    #[test]
    fn unrestricted_rule_admits_everyone() {
        let rule = ModuleAccessRule::unrestricted();
        for role in Role::ALL {
            let actor = Actor::new(role, []);
            assert!(rule.role_satisfied(role));
            assert!(rule.permission_satisfied(&actor));
        }
    }

    #[test]
    fn any_single_required_permission_is_enough() {
        let rule = ModuleAccessRule::new([], [tokens::PATIENTS_VIEW, tokens::PATIENTS_MANAGE]);
        let actor = Actor::new(Role::FrontDesk, [tokens::PATIENTS_VIEW]);
        assert!(rule.permission_satisfied(&actor));

        let other = Actor::new(Role::FrontDesk, [tokens::BILLING_VIEW]);
        assert!(!rule.permission_satisfied(&other));
    }
}
