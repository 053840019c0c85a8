//! Per-role view configuration: everything a role sees besides route rules.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medierp_core::ModuleKey;

use crate::navigation::NavigationSection;

/// Fine-grained capability flag names used in [`ModuleCapabilities`].
pub mod capability {
    pub const CAN_VIEW: &str = "can_view";
    pub const CAN_CREATE: &str = "can_create";
    pub const CAN_EDIT: &str = "can_edit";
    pub const CAN_DELETE: &str = "can_delete";
    pub const CAN_EXPORT: &str = "can_export";
    pub const CAN_PRINT: &str = "can_print";
    pub const CAN_CERTIFY: &str = "can_certify";
    pub const CAN_SIGN: &str = "can_sign";
    pub const CAN_VOID: &str = "can_void";
    pub const CAN_ADJUST_STOCK: &str = "can_adjust_stock";
    pub const CAN_ASSIGN_ROLES: &str = "can_assign_roles";
}

/// Bundle of everything configured for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleViewConfig {
    /// Menu sections in on-screen order.
    pub navigation: Vec<NavigationSection>,
    pub dashboard: DashboardWidgets,
    pub actions: ActionMatrix,
    pub settings: SettingsVisibility,
    pub capabilities: ModuleCapabilities,
}

/// Which widgets the role's landing dashboard renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardWidgets {
    pub patient_stats: bool,
    pub appointments_today: bool,
    pub pending_exams: bool,
    pub revenue: bool,
    pub inventory_alerts: bool,
    pub compliance_surveys: bool,
}

/// Which settings panels the role may open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsVisibility {
    pub company_profile: bool,
    pub users: bool,
    pub roles: bool,
    pub notifications: bool,
    pub integrations: bool,
    pub billing: bool,
}

/// CRUD-style action kinds of the action matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudAction {
    Create,
    Read,
    Update,
    Delete,
    Export,
    Import,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown action '{0}' (expected create, read, update, delete, export or import)")]
pub struct ParseCrudActionError(pub String);

impl CrudAction {
    pub const ALL: [CrudAction; 6] = [
        CrudAction::Create,
        CrudAction::Read,
        CrudAction::Update,
        CrudAction::Delete,
        CrudAction::Export,
        CrudAction::Import,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::Create => "create",
            CrudAction::Read => "read",
            CrudAction::Update => "update",
            CrudAction::Delete => "delete",
            CrudAction::Export => "export",
            CrudAction::Import => "import",
        }
    }
}

impl core::fmt::Display for CrudAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for CrudAction {
    type Err = ParseCrudActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CrudAction::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseCrudActionError(s.to_string()))
    }
}

/// Modules an action applies to.
///
/// `All` is the `*` entry of a role table and short-circuits membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleScope {
    All,
    Only(BTreeSet<ModuleKey>),
}

impl ModuleScope {
    pub fn none() -> Self {
        Self::Only(BTreeSet::new())
    }

    pub fn only(modules: impl IntoIterator<Item = ModuleKey>) -> Self {
        Self::Only(modules.into_iter().collect())
    }

    pub fn covers(&self, module: &ModuleKey) -> bool {
        match self {
            ModuleScope::All => true,
            ModuleScope::Only(modules) => modules.contains(module),
        }
    }
}

impl Default for ModuleScope {
    fn default() -> Self {
        Self::none()
    }
}

// Serialized the way the tables are written: "*" or a list of module keys.
impl Serialize for ModuleScope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ModuleScope::All => serializer.serialize_str("*"),
            ModuleScope::Only(modules) => {
                let mut seq = serializer.serialize_seq(Some(modules.len()))?;
                for m in modules {
                    seq.serialize_element(m)?;
                }
                seq.end()
            }
        }
    }
}

/// Action kind → modules the role may perform it on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionMatrix {
    pub create: ModuleScope,
    pub read: ModuleScope,
    pub update: ModuleScope,
    pub delete: ModuleScope,
    pub export: ModuleScope,
    pub import: ModuleScope,
}

impl ActionMatrix {
    /// Every action on every module.
    pub fn unrestricted() -> Self {
        Self {
            create: ModuleScope::All,
            read: ModuleScope::All,
            update: ModuleScope::All,
            delete: ModuleScope::All,
            export: ModuleScope::All,
            import: ModuleScope::All,
        }
    }

    pub fn scope(&self, action: CrudAction) -> &ModuleScope {
        match action {
            CrudAction::Create => &self.create,
            CrudAction::Read => &self.read,
            CrudAction::Update => &self.update,
            CrudAction::Delete => &self.delete,
            CrudAction::Export => &self.export,
            CrudAction::Import => &self.import,
        }
    }

    pub fn allows(&self, action: CrudAction, module: &ModuleKey) -> bool {
        self.scope(action).covers(module)
    }
}

/// Module → capability flag → granted.
///
/// Absence is meaningful: a module or flag that was never declared is denied
/// by [`PermissionEvaluator::can_perform_action`](crate::PermissionEvaluator::can_perform_action).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModuleCapabilities(BTreeMap<ModuleKey, BTreeMap<Cow<'static, str>, bool>>);

impl ModuleCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `flags` as granted on `module`.
    pub fn grant(mut self, module: ModuleKey, flags: &[&'static str]) -> Self {
        let entry = self.0.entry(module).or_default();
        for flag in flags {
            entry.insert(Cow::Borrowed(*flag), true);
        }
        self
    }

    /// Declare `flags` as explicitly withheld on `module`.
    pub fn withhold(mut self, module: ModuleKey, flags: &[&'static str]) -> Self {
        let entry = self.0.entry(module).or_default();
        for flag in flags {
            entry.insert(Cow::Borrowed(*flag), false);
        }
        self
    }

    /// The declared value of `flag` on `module`, if any.
    pub fn get(&self, module: &ModuleKey, flag: &str) -> Option<bool> {
        self.0.get(module).and_then(|flags| flags.get(flag)).copied()
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleKey> {
        self.0.keys()
    }
}
