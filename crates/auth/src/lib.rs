//! `medierp-auth`: role/permission resolution engine (pure, zero IO).
//!
//! Decides, for an authenticated [`Actor`], which navigation items are
//! visible, whether a route may be entered, and whether a module action is
//! permitted. The [`RoleConfigRegistry`] is built once and shared read-only;
//! every decision is a pure function of `(actor, request)`.

pub mod authorize;
pub mod defaults;
pub mod gate;
pub mod navigation;
pub mod overrides;
pub mod permissions;
pub mod principal;
pub mod registry;
pub mod roles;
pub mod rules;
pub mod view;

pub use authorize::{
    Decision, DecisionBasis, PermissionEvaluator, RouteDecision, UNMODELED_MODULE_DEFAULT,
};
pub use gate::ActionGate;
pub use navigation::{NavigationFilter, NavigationItem, NavigationSection};
pub use permissions::{PermissionToken, WILDCARD};
pub use principal::Actor;
pub use registry::{RegistryBuilder, RegistryError, RoleConfigRegistry};
pub use roles::{ParseRoleError, Role};
pub use rules::ModuleAccessRule;
pub use view::{
    ActionMatrix, CrudAction, DashboardWidgets, ModuleCapabilities, ModuleScope,
    ParseCrudActionError, RoleViewConfig, SettingsVisibility,
};

pub use medierp_core::ModuleKey;
