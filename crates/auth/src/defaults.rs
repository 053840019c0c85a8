//! Built-in MediERP role tables.
//!
//! Role views are produced by an exhaustive `match`, so every [`Role`] is
//! guaranteed a configuration at compile time.

use std::collections::HashMap;

use medierp_core::ModuleKey;

use crate::navigation::{NavigationItem, NavigationSection};
use crate::permissions::tokens;
use crate::rules::ModuleAccessRule;
use crate::view::{
    ActionMatrix, DashboardWidgets, ModuleCapabilities, ModuleScope, RoleViewConfig,
    SettingsVisibility, capability::*,
};
use crate::Role;

/// Business modules known to the application.
pub mod modules {
    use medierp_core::ModuleKey;

    pub const DASHBOARD: ModuleKey = ModuleKey::from_static("dashboard");
    pub const EMPRESAS: ModuleKey = ModuleKey::from_static("empresas");
    pub const PACIENTES: ModuleKey = ModuleKey::from_static("pacientes");
    pub const CITAS: ModuleKey = ModuleKey::from_static("citas");
    pub const EXAMENES: ModuleKey = ModuleKey::from_static("examenes");
    pub const HISTORIAS_CLINICAS: ModuleKey = ModuleKey::from_static("historias_clinicas");
    pub const CERTIFICACIONES: ModuleKey = ModuleKey::from_static("certificaciones");
    pub const INCAPACIDADES: ModuleKey = ModuleKey::from_static("incapacidades");
    pub const ORDENES_MEDICAS: ModuleKey = ModuleKey::from_static("ordenes_medicas");
    pub const ENCUESTAS: ModuleKey = ModuleKey::from_static("encuestas");
    pub const FACTURACION: ModuleKey = ModuleKey::from_static("facturacion");
    pub const INVENTARIO: ModuleKey = ModuleKey::from_static("inventario");
    pub const REPORTES: ModuleKey = ModuleKey::from_static("reportes");
    pub const USUARIOS: ModuleKey = ModuleKey::from_static("usuarios");
    pub const CONFIGURACION: ModuleKey = ModuleKey::from_static("configuracion");
    pub const PORTAL: ModuleKey = ModuleKey::from_static("portal");
    /// Help pages. Deliberately has no access rule.
    pub const AYUDA: ModuleKey = ModuleKey::from_static("ayuda");
}

use modules::*;

/// Route rule per module. Modules missing here are unmodeled.
pub fn module_rules() -> HashMap<ModuleKey, ModuleAccessRule> {
    use Role::*;

    HashMap::from([
        (DASHBOARD, ModuleAccessRule::unrestricted()),
        (EMPRESAS, ModuleAccessRule::new([SuperAdmin], [])),
        (
            PACIENTES,
            ModuleAccessRule::new(
                [CompanyAdmin, Clinician, Nurse, FrontDesk],
                [tokens::PATIENTS_VIEW, tokens::PATIENTS_MANAGE],
            ),
        ),
        (
            CITAS,
            ModuleAccessRule::new(
                [CompanyAdmin, Clinician, Nurse, FrontDesk],
                [tokens::APPOINTMENTS_VIEW, tokens::APPOINTMENTS_MANAGE],
            ),
        ),
        (EXAMENES, ModuleAccessRule::new([CompanyAdmin], [tokens::EXAMS_MANAGE])),
        (HISTORIAS_CLINICAS, ModuleAccessRule::new([CompanyAdmin], [tokens::MEDICAL_VIEW])),
        (
            CERTIFICACIONES,
            ModuleAccessRule::new([CompanyAdmin, Clinician], [tokens::CERTIFICATES_MANAGE]),
        ),
        (
            INCAPACIDADES,
            ModuleAccessRule::new([CompanyAdmin, Clinician], [tokens::MEDICAL_VIEW]),
        ),
        (
            ORDENES_MEDICAS,
            ModuleAccessRule::new([CompanyAdmin, Clinician], [tokens::MEDICAL_VIEW]),
        ),
        (
            ENCUESTAS,
            ModuleAccessRule::new(
                [CompanyAdmin, Clinician, Nurse],
                [tokens::SURVEYS_VIEW, tokens::SURVEYS_MANAGE],
            ),
        ),
        (
            FACTURACION,
            ModuleAccessRule::new([CompanyAdmin, Billing], [tokens::BILLING_MANAGE]),
        ),
        (
            INVENTARIO,
            ModuleAccessRule::new(
                [CompanyAdmin, Billing],
                [tokens::INVENTORY_VIEW, tokens::INVENTORY_MANAGE],
            ),
        ),
        (REPORTES, ModuleAccessRule::new([CompanyAdmin, Billing], [tokens::REPORTS_VIEW])),
        (USUARIOS, ModuleAccessRule::new([CompanyAdmin], [tokens::USERS_MANAGE])),
        (CONFIGURACION, ModuleAccessRule::new([CompanyAdmin], [tokens::SETTINGS_MANAGE])),
        (PORTAL, ModuleAccessRule::new([Patient], [])),
    ])
}

/// The complete view configuration of `role`.
pub fn view_for(role: Role) -> RoleViewConfig {
    match role {
        Role::SuperAdmin => super_admin(),
        Role::CompanyAdmin => company_admin(),
        Role::Clinician => clinician(),
        Role::Nurse => nurse(),
        Role::FrontDesk => front_desk(),
        Role::Billing => billing(),
        Role::Patient => patient(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation catalog
// ─────────────────────────────────────────────────────────────────────────────

fn inicio() -> NavigationItem {
    NavigationItem::new("Inicio", "/dashboard", "home")
}

fn ayuda() -> NavigationItem {
    NavigationItem::new("Ayuda", "/dashboard/ayuda", "life-buoy")
}

fn pacientes() -> NavigationItem {
    NavigationItem::new("Pacientes", "/dashboard/pacientes", "users")
}

fn citas(label: &str) -> NavigationItem {
    NavigationItem::new(label, "/dashboard/citas", "calendar")
}

fn examenes() -> NavigationItem {
    NavigationItem::new("Exámenes", "/dashboard/examenes", "stethoscope")
}

fn historias() -> NavigationItem {
    NavigationItem::new("Historias clínicas", "/dashboard/historias_clinicas", "folder-heart")
}

fn certificaciones() -> NavigationItem {
    NavigationItem::new("Certificaciones", "/dashboard/certificaciones", "badge-check")
}

fn incapacidades() -> NavigationItem {
    NavigationItem::new("Incapacidades", "/dashboard/incapacidades", "bed")
}

fn ordenes() -> NavigationItem {
    NavigationItem::new("Órdenes médicas", "/dashboard/ordenes_medicas", "file-text")
}

fn encuestas() -> NavigationItem {
    NavigationItem::new("Encuestas SST", "/dashboard/encuestas", "clipboard-list")
}

fn facturacion() -> NavigationItem {
    NavigationItem::new("Facturación", "/dashboard/facturacion", "receipt")
}

fn inventario() -> NavigationItem {
    NavigationItem::new("Inventario", "/dashboard/inventario", "package")
}

fn reportes() -> NavigationItem {
    NavigationItem::new("Reportes", "/dashboard/reportes", "bar-chart")
}

fn usuarios() -> NavigationItem {
    NavigationItem::new("Usuarios", "/dashboard/usuarios", "user-cog")
}

fn configuracion() -> NavigationItem {
    NavigationItem::new("Configuración", "/dashboard/configuracion", "settings")
}

fn admin_navigation(include_companies: bool) -> Vec<NavigationSection> {
    let mut general = vec![inicio()];
    if include_companies {
        general.push(NavigationItem::new("Empresas", "/dashboard/empresas", "building"));
    }

    vec![
        NavigationSection::new("General", general),
        NavigationSection::new(
            "Clínica",
            vec![
                pacientes(),
                citas("Citas"),
                examenes(),
                historias(),
                certificaciones(),
                incapacidades(),
                ordenes(),
            ],
        ),
        NavigationSection::new(
            "Administración",
            vec![facturacion(), inventario(), reportes(), encuestas()],
        ),
        NavigationSection::new("Sistema", vec![usuarios(), configuracion(), ayuda()]),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Capability helpers
// ─────────────────────────────────────────────────────────────────────────────

const FULL: &[&str] = &[CAN_VIEW, CAN_CREATE, CAN_EDIT, CAN_DELETE, CAN_EXPORT, CAN_PRINT];

fn full_capabilities(include_companies: bool) -> ModuleCapabilities {
    let mut caps = ModuleCapabilities::new();
    let mut all = vec![
        PACIENTES,
        CITAS,
        EXAMENES,
        HISTORIAS_CLINICAS,
        CERTIFICACIONES,
        INCAPACIDADES,
        ORDENES_MEDICAS,
        ENCUESTAS,
        FACTURACION,
        INVENTARIO,
        REPORTES,
        USUARIOS,
        CONFIGURACION,
    ];
    if include_companies {
        all.push(EMPRESAS);
    }
    for module in all {
        caps = caps.grant(module, FULL);
    }

    caps.grant(EXAMENES, &[CAN_SIGN])
        .grant(CERTIFICACIONES, &[CAN_CERTIFY, CAN_SIGN])
        .grant(FACTURACION, &[CAN_VOID])
        .grant(INVENTARIO, &[CAN_ADJUST_STOCK])
        .grant(USUARIOS, &[CAN_ASSIGN_ROLES])
}

// ─────────────────────────────────────────────────────────────────────────────
// Role views
// ─────────────────────────────────────────────────────────────────────────────

fn super_admin() -> RoleViewConfig {
    RoleViewConfig {
        navigation: admin_navigation(true),
        dashboard: DashboardWidgets {
            patient_stats: true,
            appointments_today: true,
            pending_exams: true,
            revenue: true,
            inventory_alerts: true,
            compliance_surveys: true,
        },
        actions: ActionMatrix::unrestricted(),
        settings: SettingsVisibility {
            company_profile: true,
            users: true,
            roles: true,
            notifications: true,
            integrations: true,
            billing: true,
        },
        capabilities: full_capabilities(true),
    }
}

fn company_admin() -> RoleViewConfig {
    RoleViewConfig {
        navigation: admin_navigation(false),
        dashboard: DashboardWidgets {
            patient_stats: true,
            appointments_today: true,
            pending_exams: true,
            revenue: true,
            inventory_alerts: true,
            compliance_surveys: true,
        },
        actions: ActionMatrix {
            delete: ModuleScope::only([CITAS, INVENTARIO, USUARIOS, ENCUESTAS]),
            ..ActionMatrix::unrestricted()
        },
        settings: SettingsVisibility {
            company_profile: true,
            users: true,
            roles: true,
            notifications: true,
            integrations: false,
            billing: true,
        },
        capabilities: full_capabilities(false),
    }
}

fn clinician() -> RoleViewConfig {
    RoleViewConfig {
        navigation: vec![
            NavigationSection::new("General", vec![inicio(), citas("Agenda")]),
            NavigationSection::new(
                "Clínica",
                vec![
                    pacientes(),
                    examenes(),
                    historias(),
                    certificaciones(),
                    incapacidades(),
                    ordenes(),
                ],
            ),
            NavigationSection::new("Cumplimiento", vec![encuestas(), ayuda()]),
        ],
        dashboard: DashboardWidgets {
            patient_stats: true,
            appointments_today: true,
            pending_exams: true,
            compliance_surveys: true,
            ..DashboardWidgets::default()
        },
        actions: ActionMatrix {
            create: ModuleScope::only([
                PACIENTES,
                EXAMENES,
                CERTIFICACIONES,
                INCAPACIDADES,
                ORDENES_MEDICAS,
                ENCUESTAS,
            ]),
            read: ModuleScope::only([
                PACIENTES,
                CITAS,
                EXAMENES,
                HISTORIAS_CLINICAS,
                CERTIFICACIONES,
                INCAPACIDADES,
                ORDENES_MEDICAS,
                ENCUESTAS,
            ]),
            update: ModuleScope::only([PACIENTES, EXAMENES, HISTORIAS_CLINICAS, CERTIFICACIONES]),
            delete: ModuleScope::none(),
            export: ModuleScope::only([HISTORIAS_CLINICAS, CERTIFICACIONES]),
            import: ModuleScope::none(),
        },
        settings: SettingsVisibility {
            notifications: true,
            ..SettingsVisibility::default()
        },
        capabilities: ModuleCapabilities::new()
            .grant(PACIENTES, &[CAN_VIEW, CAN_CREATE, CAN_EDIT])
            .grant(CITAS, &[CAN_VIEW])
            .grant(EXAMENES, &[CAN_VIEW, CAN_CREATE, CAN_EDIT, CAN_SIGN])
            .grant(HISTORIAS_CLINICAS, &[CAN_VIEW, CAN_EDIT, CAN_EXPORT, CAN_PRINT])
            .grant(
                CERTIFICACIONES,
                &[CAN_VIEW, CAN_CREATE, CAN_CERTIFY, CAN_SIGN, CAN_PRINT],
            )
            .grant(INCAPACIDADES, &[CAN_VIEW, CAN_CREATE, CAN_PRINT])
            .grant(ORDENES_MEDICAS, &[CAN_VIEW, CAN_CREATE, CAN_PRINT])
            .grant(ENCUESTAS, &[CAN_VIEW, CAN_CREATE])
            .withhold(PACIENTES, &[CAN_DELETE]),
    }
}

fn nurse() -> RoleViewConfig {
    RoleViewConfig {
        navigation: vec![
            NavigationSection::new("General", vec![inicio(), citas("Citas")]),
            NavigationSection::new("Clínica", vec![pacientes(), examenes()]),
            NavigationSection::new("Cumplimiento", vec![encuestas(), ayuda()]),
        ],
        dashboard: DashboardWidgets {
            appointments_today: true,
            pending_exams: true,
            compliance_surveys: true,
            ..DashboardWidgets::default()
        },
        actions: ActionMatrix {
            create: ModuleScope::only([CITAS, EXAMENES, ENCUESTAS]),
            read: ModuleScope::only([PACIENTES, CITAS, EXAMENES, ENCUESTAS]),
            update: ModuleScope::only([PACIENTES, CITAS]),
            ..ActionMatrix::default()
        },
        settings: SettingsVisibility {
            notifications: true,
            ..SettingsVisibility::default()
        },
        capabilities: ModuleCapabilities::new()
            .grant(PACIENTES, &[CAN_VIEW, CAN_EDIT])
            .grant(CITAS, &[CAN_VIEW, CAN_CREATE, CAN_EDIT])
            .grant(EXAMENES, &[CAN_VIEW, CAN_CREATE])
            .grant(ENCUESTAS, &[CAN_VIEW, CAN_CREATE])
            .withhold(EXAMENES, &[CAN_SIGN])
            .withhold(CERTIFICACIONES, &[CAN_CERTIFY]),
    }
}

fn front_desk() -> RoleViewConfig {
    RoleViewConfig {
        navigation: vec![
            NavigationSection::new("General", vec![inicio(), citas("Citas")]),
            NavigationSection::new("Recepción", vec![pacientes()]),
            NavigationSection::new("Caja", vec![facturacion(), ayuda()]),
        ],
        dashboard: DashboardWidgets {
            appointments_today: true,
            ..DashboardWidgets::default()
        },
        actions: ActionMatrix {
            create: ModuleScope::only([PACIENTES, CITAS, FACTURACION]),
            read: ModuleScope::only([PACIENTES, CITAS, FACTURACION]),
            update: ModuleScope::only([PACIENTES, CITAS]),
            delete: ModuleScope::only([CITAS]),
            ..ActionMatrix::default()
        },
        settings: SettingsVisibility::default(),
        capabilities: ModuleCapabilities::new()
            .grant(PACIENTES, &[CAN_VIEW, CAN_CREATE, CAN_EDIT])
            .grant(CITAS, &[CAN_VIEW, CAN_CREATE, CAN_EDIT, CAN_DELETE])
            .grant(FACTURACION, &[CAN_VIEW, CAN_CREATE, CAN_PRINT])
            .withhold(FACTURACION, &[CAN_VOID]),
    }
}

fn billing() -> RoleViewConfig {
    RoleViewConfig {
        navigation: vec![
            NavigationSection::new("General", vec![inicio()]),
            NavigationSection::new(
                "Finanzas",
                vec![facturacion(), inventario(), reportes(), ayuda()],
            ),
        ],
        dashboard: DashboardWidgets {
            revenue: true,
            inventory_alerts: true,
            ..DashboardWidgets::default()
        },
        actions: ActionMatrix {
            create: ModuleScope::only([FACTURACION]),
            read: ModuleScope::only([FACTURACION, INVENTARIO, REPORTES]),
            update: ModuleScope::only([FACTURACION, INVENTARIO]),
            export: ModuleScope::only([FACTURACION, INVENTARIO, REPORTES]),
            import: ModuleScope::only([INVENTARIO]),
            ..ActionMatrix::default()
        },
        settings: SettingsVisibility {
            billing: true,
            ..SettingsVisibility::default()
        },
        capabilities: ModuleCapabilities::new()
            .grant(
                FACTURACION,
                &[CAN_VIEW, CAN_CREATE, CAN_EDIT, CAN_VOID, CAN_EXPORT, CAN_PRINT],
            )
            .grant(INVENTARIO, &[CAN_VIEW, CAN_ADJUST_STOCK, CAN_EXPORT])
            .grant(REPORTES, &[CAN_VIEW, CAN_EXPORT]),
    }
}

fn patient() -> RoleViewConfig {
    RoleViewConfig {
        navigation: vec![
            NavigationSection::new("General", vec![inicio()]),
            NavigationSection::new(
                "Mi salud",
                vec![
                    NavigationItem::new("Mis citas", "/dashboard/portal/citas", "calendar"),
                    NavigationItem::new(
                        "Mis resultados",
                        "/dashboard/portal/resultados",
                        "file-check",
                    )
                    .with_badge("nuevo"),
                    NavigationItem::new(
                        "Mis certificados",
                        "/dashboard/portal/certificados",
                        "badge-check",
                    ),
                    encuestas().hidden(),
                ],
            ),
            NavigationSection::new("Soporte", vec![ayuda()]),
        ],
        dashboard: DashboardWidgets::default(),
        actions: ActionMatrix {
            read: ModuleScope::only([PORTAL]),
            ..ActionMatrix::default()
        },
        settings: SettingsVisibility {
            notifications: true,
            ..SettingsVisibility::default()
        },
        capabilities: ModuleCapabilities::new().grant(PORTAL, &[CAN_VIEW, CAN_PRINT]),
    }
}
