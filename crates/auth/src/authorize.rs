use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use medierp_core::ModuleKey;

use crate::gate::ActionGate;
use crate::navigation::{NavigationFilter, NavigationSection};
use crate::overrides::{self, Override};
use crate::rules::ModuleAccessRule;
use crate::view::CrudAction;
use crate::{Actor, PermissionToken, Role, RoleConfigRegistry};

/// Binary outcome of every policy check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(self) -> bool {
        self == Decision::Allow
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

/// Outcome for route modules that have no [`ModuleAccessRule`].
///
/// Fail-open, preserved as found. Whether unmodeled modules should be
/// reachable is an open question for the system owner; set this to
/// [`Decision::Deny`] to make the rule table exhaustive.
pub const UNMODELED_MODULE_DEFAULT: Decision = Decision::Allow;

/// Which step of the route algorithm decided.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    NoActor,
    TopRole,
    Wildcard,
    ClinicalOverride,
    BillingOverride,
    UnmodeledModule,
    RuleSatisfied,
    RoleMismatch,
    MissingPermission,
}

impl DecisionBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            DecisionBasis::NoActor => "no_actor",
            DecisionBasis::TopRole => "top_role",
            DecisionBasis::Wildcard => "wildcard",
            DecisionBasis::ClinicalOverride => "clinical_override",
            DecisionBasis::BillingOverride => "billing_override",
            DecisionBasis::UnmodeledModule => "unmodeled_module",
            DecisionBasis::RuleSatisfied => "rule_satisfied",
            DecisionBasis::RoleMismatch => "role_mismatch",
            DecisionBasis::MissingPermission => "missing_permission",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Route Decision Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed, auditable record of a route decision.
///
/// Answers "why was this screen allowed/denied?" without re-deriving the
/// algorithm at the call site.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDecision {
    /// Path as requested.
    pub path: String,

    /// Module the path normalized to.
    pub module: ModuleKey,

    /// `None` when no (valid) actor was supplied.
    pub role: Option<Role>,

    pub outcome: Decision,

    pub basis: DecisionBasis,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// The rule that was consulted, if the algorithm got that far.
    pub rule: Option<ModuleAccessRule>,

    /// If denied, how the actor could be granted access.
    pub suggestions: Vec<String>,

    pub evaluated_at: DateTime<Utc>,
}

impl RouteDecision {
    pub fn allowed(&self) -> bool {
        self.outcome.is_allow()
    }
}

/// Pure decision functions over a shared [`RoleConfigRegistry`].
///
/// - No IO
/// - No panics
/// - No mutable state; cloning shares the registry
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    registry: Arc<RoleConfigRegistry>,
}

impl PermissionEvaluator {
    pub fn new(registry: Arc<RoleConfigRegistry>) -> Self {
        Self { registry }
    }

    /// Evaluator over the built-in MediERP tables.
    pub fn standard() -> Self {
        Self::new(Arc::new(RoleConfigRegistry::standard()))
    }

    pub fn registry(&self) -> &RoleConfigRegistry {
        &self.registry
    }

    /// Whether `actor` may enter the screen at `path`.
    ///
    /// First matching step wins:
    /// 1. no actor → deny
    /// 2. top role or wildcard token → allow
    /// 3. capability-class override → allow
    /// 4. no rule for the module → [`UNMODELED_MODULE_DEFAULT`]
    /// 5. role and permission requirements must both hold
    pub fn can_access_route(&self, actor: Option<&Actor>, path: &str) -> bool {
        let module = ModuleKey::from_path(path);
        let (outcome, basis, _) = self.evaluate(actor, &module);
        trace_route_decision(actor.map(Actor::role), &module, outcome, basis);
        outcome.is_allow()
    }

    /// Same decision as [`can_access_route`](Self::can_access_route), with the
    /// reasoning attached.
    pub fn explain_route(&self, actor: Option<&Actor>, path: &str) -> RouteDecision {
        let module = ModuleKey::from_path(path);
        let (outcome, basis, rule) = self.evaluate(actor, &module);
        trace_route_decision(actor.map(Actor::role), &module, outcome, basis);

        let role = actor.map(Actor::role);
        let role_label = role.map_or("<none>", |r| r.as_str());

        let reason = match basis {
            DecisionBasis::NoActor => "No authenticated actor was supplied".to_string(),
            DecisionBasis::TopRole => format!("Role '{role_label}' is granted every route"),
            DecisionBasis::Wildcard => "Actor holds the wildcard permission '*'".to_string(),
            DecisionBasis::ClinicalOverride => format!(
                "Role '{role_label}' holds a broad clinical permission; '{module}' is clinical"
            ),
            DecisionBasis::BillingOverride => {
                let token = overrides::BILLING_OVERRIDE_TOKEN;
                format!("Actor holds '{token}' which grants '{module}'")
            }
            DecisionBasis::UnmodeledModule => {
                format!("Module '{module}' has no access rule; unmodeled modules are open")
            }
            DecisionBasis::RuleSatisfied => {
                format!("Role '{role_label}' and permissions satisfy the rule for '{module}'")
            }
            DecisionBasis::RoleMismatch => {
                format!("Role '{role_label}' is not among the roles allowed on '{module}'")
            }
            DecisionBasis::MissingPermission => {
                format!("Actor holds none of the permissions required by '{module}'")
            }
        };

        let mut suggestions = Vec::new();
        if let Some(rule) = rule.filter(|_| !outcome.is_allow()) {
            if role.is_some_and(|r| !rule.role_satisfied(r)) {
                suggestions.push(format!(
                    "Assign one of the roles {:?}",
                    rule.required_roles.iter().map(Role::as_str).collect::<Vec<_>>()
                ));
            }
            if !rule.required_permissions.is_empty() {
                suggestions.push(format!(
                    "Grant one of the permissions {:?}",
                    rule.required_permissions
                        .iter()
                        .map(PermissionToken::as_str)
                        .collect::<Vec<_>>()
                ));
            }
        }
        if basis == DecisionBasis::NoActor {
            suggestions.push("Authenticate through the identity provider".to_string());
        }

        RouteDecision {
            path: path.to_string(),
            module,
            role,
            outcome,
            basis,
            reason,
            rule: rule.cloned(),
            suggestions,
            evaluated_at: Utc::now(),
        }
    }

    /// Whether the actor's role declares `flag` as granted on `module`.
    ///
    /// Fail-closed: an undeclared module or flag is denied. Note the asymmetry
    /// with route access, which fails open for unmodeled modules. Neither the
    /// top role nor the wildcard token short-circuit this check; the role's
    /// capability map is the whole truth.
    pub fn can_perform_action(
        &self,
        actor: Option<&Actor>,
        module: &ModuleKey,
        flag: &str,
    ) -> bool {
        let granted = actor.is_some_and(|actor| {
            self.registry
                .config(actor.role())
                .capabilities
                .get(module, flag)
                .unwrap_or(false)
        });

        let outcome = if granted { Decision::Allow } else { Decision::Deny };
        tracing::debug!(
            decision = "action",
            role = actor.map_or("<none>", |a| a.role().as_str()),
            module = %module,
            action = flag,
            outcome = outcome.as_str(),
        );

        granted
    }

    /// Whether the role's action matrix allows `action` on `module`.
    pub fn can_crud(&self, actor: Option<&Actor>, action: CrudAction, module: &ModuleKey) -> bool {
        let granted = actor
            .is_some_and(|actor| self.registry.config(actor.role()).actions.allows(action, module));
        let outcome = if granted { Decision::Allow } else { Decision::Deny };

        tracing::debug!(
            decision = "crud",
            role = actor.map_or("<none>", |a| a.role().as_str()),
            module = %module,
            action = action.as_str(),
            outcome = outcome.as_str(),
        );

        granted
    }

    /// Permission-token check for UI code: the wildcard grants everything.
    pub fn has_permission(&self, actor: Option<&Actor>, token: &PermissionToken) -> bool {
        actor.is_some_and(|a| a.has_wildcard() || a.holds(token))
    }

    pub fn has_any_permission(&self, actor: Option<&Actor>, tokens: &[PermissionToken]) -> bool {
        actor.is_some_and(|a| a.has_wildcard() || a.holds_any(tokens))
    }

    pub fn navigation(&self) -> NavigationFilter<'_> {
        NavigationFilter::new(self)
    }

    pub fn visible_navigation(&self, actor: Option<&Actor>) -> Vec<NavigationSection> {
        self.navigation().visible_navigation(actor)
    }

    pub fn gate<'a>(&'a self, actor: Option<&'a Actor>) -> ActionGate<'a> {
        ActionGate::new(self, actor)
    }

    fn evaluate(
        &self,
        actor: Option<&Actor>,
        module: &ModuleKey,
    ) -> (Decision, DecisionBasis, Option<&ModuleAccessRule>) {
        let Some(actor) = actor else {
            return (Decision::Deny, DecisionBasis::NoActor, None);
        };

        if actor.role().is_top() {
            return (Decision::Allow, DecisionBasis::TopRole, None);
        }
        if actor.has_wildcard() {
            return (Decision::Allow, DecisionBasis::Wildcard, None);
        }

        match overrides::matching_override(actor, module) {
            Some(Override::BroadClinical) => {
                return (Decision::Allow, DecisionBasis::ClinicalOverride, None);
            }
            Some(Override::Billing) => {
                return (Decision::Allow, DecisionBasis::BillingOverride, None);
            }
            None => {}
        }

        let Some(rule) = self.registry.module_rule(module) else {
            return (UNMODELED_MODULE_DEFAULT, DecisionBasis::UnmodeledModule, None);
        };

        if !rule.role_satisfied(actor.role()) {
            return (Decision::Deny, DecisionBasis::RoleMismatch, Some(rule));
        }
        if !rule.permission_satisfied(actor) {
            return (Decision::Deny, DecisionBasis::MissingPermission, Some(rule));
        }

        (Decision::Allow, DecisionBasis::RuleSatisfied, Some(rule))
    }
}

fn trace_route_decision(
    role: Option<Role>,
    module: &ModuleKey,
    outcome: Decision,
    basis: DecisionBasis,
) {
    let role = role.map_or("<none>", |r| r.as_str());
    match outcome {
        Decision::Allow => tracing::debug!(
            decision = "route",
            role,
            module = %module,
            outcome = outcome.as_str(),
            basis = basis.as_str(),
        ),
        Decision::Deny => tracing::info!(
            decision = "route",
            role,
            module = %module,
            outcome = outcome.as_str(),
            basis = basis.as_str(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::modules;
    use crate::permissions::tokens;
    use crate::view::{RoleViewConfig, capability};
    use proptest::prelude::*;

    const CAJA: ModuleKey = ModuleKey::from_static("caja");
    const ABIERTO: ModuleKey = ModuleKey::from_static("abierto");

    fn standard() -> PermissionEvaluator {
        PermissionEvaluator::standard()
    }

    /// Registry with one strict module, one unrestricted module and nothing else.
    fn custom() -> PermissionEvaluator {
        let registry = RoleConfigRegistry::builder()
            .view(Role::Patient, RoleViewConfig::default())
            .rule(CAJA, ModuleAccessRule::new([Role::CompanyAdmin], [tokens::BILLING_VIEW]))
            .rule(ABIERTO, ModuleAccessRule::unrestricted())
            .build()
            .unwrap();
        PermissionEvaluator::new(Arc::new(registry))
    }

    fn token_names() -> Vec<&'static str> {
        vec![
            "medical_view",
            "patients_view",
            "patients_manage",
            "exams_manage",
            "billing_view",
            "billing_manage",
            "reports_view",
            "users_manage",
        ]
    }

    fn arb_actor() -> impl Strategy<Value = Actor> {
        (
            prop::sample::select(Role::ALL.to_vec()),
            prop::collection::btree_set(prop::sample::select(token_names()), 0..5),
        )
            .prop_map(|(role, perms)| {
                Actor::new(role, perms.into_iter().map(PermissionToken::from_static))
            })
    }

    fn arb_path() -> impl Strategy<Value = String> {
        "(/dashboard)?(/[a-z_]{0,18}){0,3}"
    }

    #[test]
    fn absent_actor_is_denied_everything() {
        let ev = standard();
        assert!(!ev.can_access_route(None, "/dashboard"));
        assert!(!ev.can_access_route(None, "/dashboard/ayuda"));
        assert!(!ev.can_perform_action(None, &modules::PORTAL, capability::CAN_VIEW));
        assert!(!ev.can_crud(None, CrudAction::Read, &modules::PORTAL));
        assert_eq!(ev.explain_route(None, "/").basis, DecisionBasis::NoActor);
    }

    #[test]
    fn strict_rule_requires_role_and_permission() {
        let ev = custom();

        let patient = Actor::new(Role::Patient, []);
        assert!(!ev.can_access_route(Some(&patient), "/dashboard/caja"));

        let admin_with_token = Actor::new(Role::CompanyAdmin, [tokens::BILLING_VIEW]);
        assert!(ev.can_access_route(Some(&admin_with_token), "/dashboard/caja"));

        let admin_without_token = Actor::new(Role::CompanyAdmin, []);
        assert!(!ev.can_access_route(Some(&admin_without_token), "/dashboard/caja"));
        assert_eq!(
            ev.explain_route(Some(&admin_without_token), "/dashboard/caja").basis,
            DecisionBasis::MissingPermission
        );

        let billing_with_token = Actor::new(Role::Billing, [tokens::BILLING_VIEW]);
        assert_eq!(
            ev.explain_route(Some(&billing_with_token), "caja").basis,
            DecisionBasis::RoleMismatch
        );
    }

    #[test]
    fn clinician_with_medical_view_enters_exams_via_override() {
        let ev = standard();
        let rule = ev.registry().module_rule(&modules::EXAMENES).unwrap();
        assert!(!rule.required_roles.contains(&Role::Clinician));

        let actor = Actor::new(Role::Clinician, [tokens::MEDICAL_VIEW]);
        assert!(ev.can_access_route(Some(&actor), "examenes"));
        assert_eq!(
            ev.explain_route(Some(&actor), "/dashboard/examenes").basis,
            DecisionBasis::ClinicalOverride
        );

        let without_token = Actor::new(Role::Clinician, []);
        assert!(!ev.can_access_route(Some(&without_token), "examenes"));
    }

    #[test]
    fn billing_view_grants_billing_module_to_any_role() {
        let ev = standard();
        let actor = Actor::new(Role::Nurse, [tokens::BILLING_VIEW]);
        assert!(ev.can_access_route(Some(&actor), "/dashboard/facturacion"));
        assert!(!ev.can_access_route(Some(&actor), "/dashboard/inventario"));
    }

    #[test]
    fn unmodeled_module_fails_open() {
        let ev = standard();
        assert!(ev.registry().module_rule(&modules::AYUDA).is_none());

        let actor = Actor::new(Role::Patient, []);
        let decision = ev.explain_route(Some(&actor), "/dashboard/ayuda");
        assert_eq!(decision.outcome, UNMODELED_MODULE_DEFAULT);
        assert_eq!(decision.basis, DecisionBasis::UnmodeledModule);
    }

    #[test]
    fn unknown_module_action_fails_closed_for_every_actor() {
        let ev = standard();
        let unknown = ModuleKey::from_static("unknown_module");
        for role in Role::ALL {
            let actor = Actor::new(role, [PermissionToken::wildcard()]);
            assert!(!ev.can_perform_action(Some(&actor), &unknown, capability::CAN_CERTIFY));
        }
    }

    #[test]
    fn undeclared_flag_on_known_module_is_denied() {
        let ev = standard();
        let clinician = Actor::new(Role::Clinician, [tokens::MEDICAL_VIEW]);
        let clinician = Some(&clinician);
        let certificates = &modules::CERTIFICACIONES;
        assert!(ev.can_perform_action(clinician, certificates, capability::CAN_CERTIFY));
        assert!(!ev.can_perform_action(clinician, certificates, capability::CAN_DELETE));
        assert!(!ev.can_perform_action(clinician, &modules::PACIENTES, capability::CAN_DELETE));

        let nurse = Actor::new(Role::Nurse, [tokens::MEDICAL_VIEW]);
        assert!(!ev.can_perform_action(
            Some(&nurse),
            &modules::CERTIFICACIONES,
            capability::CAN_CERTIFY
        ));
    }

    #[test]
    fn crud_matrix_wildcard_and_lists() {
        let ev = standard();
        let super_admin = Actor::new(Role::SuperAdmin, []);
        let anything = ModuleKey::from_static("anything");
        assert!(ev.can_crud(Some(&super_admin), CrudAction::Import, &anything));

        let admin = Actor::new(Role::CompanyAdmin, []);
        assert!(ev.can_crud(Some(&admin), CrudAction::Update, &modules::FACTURACION));
        assert!(!ev.can_crud(Some(&admin), CrudAction::Delete, &modules::FACTURACION));

        let front_desk = Actor::new(Role::FrontDesk, []);
        assert!(ev.can_crud(Some(&front_desk), CrudAction::Delete, &modules::CITAS));
        assert!(!ev.can_crud(Some(&front_desk), CrudAction::Export, &modules::CITAS));
    }

    #[test]
    fn has_permission_honours_wildcard() {
        let ev = standard();
        let actor = Actor::new(Role::Billing, [PermissionToken::wildcard()]);
        assert!(ev.has_permission(Some(&actor), &tokens::USERS_MANAGE));
        assert!(ev.has_any_permission(Some(&actor), &[tokens::SETTINGS_MANAGE]));

        let plain = Actor::new(Role::Billing, [tokens::REPORTS_VIEW]);
        assert!(!ev.has_permission(Some(&plain), &tokens::USERS_MANAGE));
        assert!(ev.has_any_permission(Some(&plain), &[tokens::USERS_MANAGE, tokens::REPORTS_VIEW]));
        assert!(!ev.has_permission(None, &tokens::REPORTS_VIEW));
    }

    #[test]
    fn denial_explanation_carries_rule_and_suggestions() {
        let ev = standard();
        let actor = Actor::new(Role::Patient, []);
        let decision = ev.explain_route(Some(&actor), "/dashboard/usuarios?page=2");

        assert!(!decision.allowed());
        assert_eq!(decision.module, modules::USUARIOS);
        assert_eq!(decision.basis, DecisionBasis::RoleMismatch);
        assert!(decision.rule.is_some());
        assert_eq!(decision.suggestions.len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the wildcard token opens every path, for every role.
        #[test]
        fn wildcard_supremacy(actor in arb_actor(), path in arb_path()) {
            let mut perms: Vec<PermissionToken> = actor.permissions().iter().cloned().collect();
            perms.push(PermissionToken::wildcard());
            let actor = Actor::new(actor.role(), perms);
            prop_assert!(standard().can_access_route(Some(&actor), &path));
            prop_assert!(custom().can_access_route(Some(&actor), &path));
        }

        /// Property: the top role opens every path, whatever its permissions.
        #[test]
        fn top_role_supremacy(actor in arb_actor(), path in arb_path()) {
            let actor = Actor::new(Role::TOP, actor.permissions().iter().cloned());
            prop_assert!(standard().can_access_route(Some(&actor), &path));
            prop_assert!(custom().can_access_route(Some(&actor), &path));
        }

        /// Property: a rule with no requirements admits every actor.
        #[test]
        fn unrestricted_module_admits_everyone(actor in arb_actor()) {
            prop_assert!(custom().can_access_route(Some(&actor), "/dashboard/abierto"));
            prop_assert!(standard().can_access_route(Some(&actor), "/dashboard"));
        }

        /// Property: prefixed and bare paths to the same module decide alike.
        #[test]
        fn prefix_does_not_change_decision(actor in arb_actor(), module in "[a-z_]{1,18}") {
            let ev = standard();
            prop_assert_eq!(
                ev.can_access_route(Some(&actor), &format!("/dashboard/{module}")),
                ev.can_access_route(Some(&actor), &module)
            );
        }

        /// Property: explain_route and can_access_route never disagree.
        #[test]
        fn explanation_matches_decision(actor in arb_actor(), path in arb_path()) {
            let ev = standard();
            prop_assert_eq!(
                ev.explain_route(Some(&actor), &path).allowed(),
                ev.can_access_route(Some(&actor), &path)
            );
        }
    }
}
