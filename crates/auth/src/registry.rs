//! Process-wide, immutable role configuration table.

use std::collections::HashMap;

use thiserror::Error;

use medierp_core::ModuleKey;

use crate::navigation::NavigationItem;
use crate::rules::ModuleAccessRule;
use crate::view::RoleViewConfig;
use crate::{Role, defaults};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("fallback role '{0}' has no view configuration")]
    MissingFallbackView(Role),

    #[error("role '{role}': item '{path}' declares '{declared}' but normalizes to '{normalized}'")]
    NavigationKeyMismatch {
        role: Role,
        path: String,
        declared: ModuleKey,
        normalized: ModuleKey,
    },
}

/// Role → view configuration, plus module → access rule.
///
/// Built once at startup and never mutated afterwards; share it behind an
/// `Arc` across any number of threads.
#[derive(Debug, Clone)]
pub struct RoleConfigRegistry {
    views: HashMap<Role, RoleViewConfig>,
    rules: HashMap<ModuleKey, ModuleAccessRule>,
    fallback_role: Role,
    fallback_view: RoleViewConfig,
}

impl RoleConfigRegistry {
    /// The built-in MediERP configuration (every role configured).
    pub fn standard() -> Self {
        let fallback_role = Role::LEAST_PRIVILEGED;
        let views = Role::ALL
            .into_iter()
            .filter(|r| *r != fallback_role)
            .map(|r| (r, defaults::view_for(r)))
            .collect();

        Self {
            views,
            rules: defaults::module_rules(),
            fallback_role,
            fallback_view: defaults::view_for(fallback_role),
        }
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// View configuration for `role`.
    ///
    /// Never fails: a role without its own entry resolves to the fallback
    /// (least-privileged) role's view.
    pub fn config(&self, role: Role) -> &RoleViewConfig {
        if role == self.fallback_role {
            return &self.fallback_view;
        }
        self.views.get(&role).unwrap_or(&self.fallback_view)
    }

    /// Whether `role` has its own view (as opposed to resolving to the fallback).
    pub fn has_view(&self, role: Role) -> bool {
        role == self.fallback_role || self.views.contains_key(&role)
    }

    /// Visible navigation items of `role`, flattened in declaration order.
    pub fn navigation(&self, role: Role) -> Vec<&NavigationItem> {
        self.config(role)
            .navigation
            .iter()
            .flat_map(|section| section.items.iter())
            .filter(|item| item.visible)
            .collect()
    }

    pub fn module_rule(&self, module: &ModuleKey) -> Option<&ModuleAccessRule> {
        self.rules.get(module)
    }

    /// All configured module rules, ordered by module key.
    pub fn module_rules(&self) -> Vec<(&ModuleKey, &ModuleAccessRule)> {
        let mut rules: Vec<_> = self.rules.iter().collect();
        rules.sort_by(|a, b| a.0.cmp(b.0));
        rules
    }

    pub fn fallback_role(&self) -> Role {
        self.fallback_role
    }
}

impl Default for RoleConfigRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Assembles a custom [`RoleConfigRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    views: HashMap<Role, RoleViewConfig>,
    rules: HashMap<ModuleKey, ModuleAccessRule>,
    fallback_role: Role,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
            rules: HashMap::new(),
            fallback_role: Role::LEAST_PRIVILEGED,
        }
    }
}

impl RegistryBuilder {
    pub fn view(mut self, role: Role, config: RoleViewConfig) -> Self {
        self.views.insert(role, config);
        self
    }

    pub fn rule(mut self, module: ModuleKey, rule: ModuleAccessRule) -> Self {
        self.rules.insert(module, rule);
        self
    }

    pub fn fallback_role(mut self, role: Role) -> Self {
        self.fallback_role = role;
        self
    }

    pub fn build(mut self) -> Result<RoleConfigRegistry, RegistryError> {
        for (role, view) in &self.views {
            validate_navigation(*role, view)?;
        }

        let fallback_view = self
            .views
            .remove(&self.fallback_role)
            .ok_or(RegistryError::MissingFallbackView(self.fallback_role))?;

        Ok(RoleConfigRegistry {
            views: self.views,
            rules: self.rules,
            fallback_role: self.fallback_role,
            fallback_view,
        })
    }
}

fn validate_navigation(role: Role, view: &RoleViewConfig) -> Result<(), RegistryError> {
    for item in view.navigation.iter().flat_map(|s| s.items.iter()) {
        let normalized = ModuleKey::from_path(&item.path);
        if normalized != item.module_key {
            return Err(RegistryError::NavigationKeyMismatch {
                role,
                path: item.path.clone(),
                declared: item.module_key.clone(),
                normalized,
            });
        }
    }
    Ok(())
}
