//! Navigation menu model and per-actor menu filtering.

use serde::{Deserialize, Serialize};

use medierp_core::ModuleKey;

use crate::{Actor, PermissionEvaluator};

/// One entry of the side menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub label: String,
    pub path: String,
    /// Module `path` normalizes to. Registry construction verifies this.
    pub module_key: ModuleKey,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// `false` hides the item before any permission check runs.
    pub visible: bool,
}

impl NavigationItem {
    pub fn new(label: impl Into<String>, path: impl Into<String>, icon: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            label: label.into(),
            module_key: ModuleKey::from_path(&path),
            path,
            icon: icon.into(),
            badge: None,
            visible: true,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Titled group of menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationSection {
    pub title: String,
    pub items: Vec<NavigationItem>,
}

impl NavigationSection {
    pub fn new(title: impl Into<String>, items: Vec<NavigationItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

/// Derives the menu an actor gets to see.
///
/// Display only: [`PermissionEvaluator::can_access_route`] stays authoritative
/// for actual navigation, even when the fail-safe baseline is returned.
#[derive(Debug, Clone, Copy)]
pub struct NavigationFilter<'a> {
    evaluator: &'a PermissionEvaluator,
}

impl<'a> NavigationFilter<'a> {
    pub fn new(evaluator: &'a PermissionEvaluator) -> Self {
        Self { evaluator }
    }

    /// The actor's role menu, filtered by route access.
    ///
    /// An absent actor has no role and therefore no menu at all.
    pub fn visible_navigation(&self, actor: Option<&Actor>) -> Vec<NavigationSection> {
        let Some(actor) = actor else {
            return Vec::new();
        };

        let sections = &self.evaluator.registry().config(actor.role()).navigation;
        self.filter_sections(Some(actor), sections)
    }

    /// Keep the items of `sections` the actor may enter, dropping emptied
    /// sections.
    ///
    /// If nothing survives, the baseline of `sections` (hidden items removed,
    /// otherwise untouched) is returned instead of an empty menu. Re-filtering
    /// the result for the same actor returns it unchanged.
    pub fn filter_sections(
        &self,
        actor: Option<&Actor>,
        sections: &[NavigationSection],
    ) -> Vec<NavigationSection> {
        let Some(actor) = actor else {
            return Vec::new();
        };

        let filtered = retain_items(sections, |item| {
            self.evaluator.can_access_route(Some(actor), &item.path)
        });

        if filtered.is_empty() {
            tracing::warn!(
                role = %actor.role(),
                "navigation filter removed every item; serving baseline menu"
            );
            return baseline(sections);
        }

        filtered
    }
}

/// `sections` with hidden items and then-empty sections removed.
pub fn baseline(sections: &[NavigationSection]) -> Vec<NavigationSection> {
    retain_items(sections, |_| true)
}

fn retain_items<F>(sections: &[NavigationSection], mut keep: F) -> Vec<NavigationSection>
where
    F: FnMut(&NavigationItem) -> bool,
{
    sections
        .iter()
        .filter_map(|section| {
            let items: Vec<NavigationItem> = section
                .items
                .iter()
                .filter(|item| item.visible && keep(item))
                .cloned()
                .collect();

            (!items.is_empty()).then(|| NavigationSection {
                title: section.title.clone(),
                items,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::permissions::tokens;
    use crate::rules::ModuleAccessRule;
    use crate::view::RoleViewConfig;
    use crate::{PermissionToken, Role, RoleConfigRegistry};
    use proptest::prelude::*;

    fn titles(sections: &[NavigationSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    fn labels(sections: &[NavigationSection]) -> Vec<&str> {
        sections
            .iter()
            .flat_map(|s| s.items.iter().map(|i| i.label.as_str()))
            .collect()
    }

    #[test]
    fn sections_left_empty_are_dropped() {
        let ev = PermissionEvaluator::standard();
        let actor = Actor::new(Role::Clinician, []);
        let menu = ev.visible_navigation(Some(&actor));

        assert_eq!(titles(&menu), vec!["General", "Cumplimiento"]);
        assert_eq!(labels(&menu), vec!["Inicio", "Ayuda"]);
    }

    #[test]
    fn override_tokens_widen_the_menu() {
        let ev = PermissionEvaluator::standard();

        let plain = Actor::new(Role::FrontDesk, [tokens::PATIENTS_VIEW, tokens::APPOINTMENTS_VIEW]);
        assert_eq!(
            labels(&ev.visible_navigation(Some(&plain))),
            vec!["Inicio", "Citas", "Pacientes", "Ayuda"]
        );

        let cashier = Actor::new(
            Role::FrontDesk,
            [tokens::PATIENTS_VIEW, tokens::APPOINTMENTS_VIEW, tokens::BILLING_VIEW],
        );
        assert_eq!(
            labels(&ev.visible_navigation(Some(&cashier))),
            vec!["Inicio", "Citas", "Pacientes", "Facturación", "Ayuda"]
        );
    }

    #[test]
    fn hidden_items_never_show() {
        let ev = PermissionEvaluator::standard();
        let actor = Actor::new(Role::Patient, [PermissionToken::wildcard()]);
        let menu = ev.visible_navigation(Some(&actor));

        assert!(!labels(&menu).contains(&"Encuestas SST"));
        assert!(labels(&menu).contains(&"Mis resultados"));
    }

    #[test]
    fn empty_result_falls_back_to_baseline() {
        let sections = vec![
            NavigationSection::new(
                "Sistema",
                vec![
                    NavigationItem::new("Usuarios", "/dashboard/usuarios", "user-cog"),
                    NavigationItem::new("Oculto", "/dashboard/usuarios/roles", "eye-off").hidden(),
                ],
            ),
            NavigationSection::new(
                "Vacía",
                vec![NavigationItem::new("Nada", "/dashboard/usuarios", "x").hidden()],
            ),
        ];
        let registry = RoleConfigRegistry::builder()
            .view(
                Role::Patient,
                RoleViewConfig {
                    navigation: sections.clone(),
                    ..RoleViewConfig::default()
                },
            )
            .rule(
                ModuleKey::from_static("usuarios"),
                ModuleAccessRule::new([Role::CompanyAdmin], [tokens::USERS_MANAGE]),
            )
            .build()
            .unwrap();
        let ev = PermissionEvaluator::new(Arc::new(registry));
        let actor = Actor::new(Role::Patient, []);

        assert!(!ev.can_access_route(Some(&actor), "/dashboard/usuarios"));

        let menu = ev.visible_navigation(Some(&actor));
        assert_eq!(menu, baseline(&sections));
        assert_eq!(titles(&menu), vec!["Sistema"]);
        assert_eq!(labels(&menu), vec!["Usuarios"]);

        // Showing the baseline grants nothing.
        assert!(!ev.can_access_route(Some(&actor), &menu[0].items[0].path));
    }

    #[test]
    fn absent_actor_gets_no_menu() {
        let ev = PermissionEvaluator::standard();
        assert!(ev.visible_navigation(None).is_empty());
    }

    fn arb_actor() -> impl Strategy<Value = Actor> {
        let names = vec![
            "*",
            "medical_view",
            "patients_view",
            "appointments_view",
            "exams_manage",
            "billing_view",
            "billing_manage",
            "inventory_view",
            "surveys_view",
            "users_manage",
        ];
        (
            prop::sample::select(Role::ALL.to_vec()),
            prop::collection::btree_set(prop::sample::select(names), 0..6),
        )
            .prop_map(|(role, perms)| {
                Actor::new(role, perms.into_iter().map(PermissionToken::from_static))
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: filtering an already filtered menu changes nothing.
        #[test]
        fn filtering_is_idempotent(actor in arb_actor()) {
            let ev = PermissionEvaluator::standard();
            let filter = ev.navigation();
            let once = filter.visible_navigation(Some(&actor));
            let twice = filter.filter_sections(Some(&actor), &once);
            prop_assert_eq!(once, twice);
        }

        /// Property: a configured actor never gets an empty menu.
        #[test]
        fn menu_is_never_empty(actor in arb_actor()) {
            let ev = PermissionEvaluator::standard();
            prop_assert!(!ev.visible_navigation(Some(&actor)).is_empty());
        }
    }
}
