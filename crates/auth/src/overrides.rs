//! Capability-class overrides.
//!
//! Some roles need breadth the per-module rule table does not express
//! economically. Each override is a named predicate consulted by route
//! evaluation only; permission-token and capability checks ignore them.

use serde::Serialize;

use medierp_core::ModuleKey;

use crate::defaults::modules;
use crate::permissions::tokens;
use crate::{Actor, PermissionToken, Role};

/// Modules that make up the clinical route set.
pub const CLINICAL_ROUTE_SET: [ModuleKey; 8] = [
    modules::PACIENTES,
    modules::CITAS,
    modules::EXAMENES,
    modules::HISTORIAS_CLINICAS,
    modules::CERTIFICACIONES,
    modules::INCAPACIDADES,
    modules::ORDENES_MEDICAS,
    modules::ENCUESTAS,
];

/// Roles eligible for the clinical override.
pub const CLINICAL_ROLES: [Role; 2] = [Role::Clinician, Role::Nurse];

/// Holding any one of these unlocks the clinical route set for clinical roles.
pub const BROAD_CLINICAL_TOKENS: [PermissionToken; 3] = [
    tokens::MEDICAL_VIEW,
    tokens::PATIENTS_MANAGE,
    tokens::EXAMS_MANAGE,
];

pub const BILLING_MODULE: ModuleKey = modules::FACTURACION;

pub const BILLING_OVERRIDE_TOKEN: PermissionToken = tokens::BILLING_VIEW;

/// Which override granted access.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Override {
    BroadClinical,
    Billing,
}

pub fn is_clinical_module(module: &ModuleKey) -> bool {
    CLINICAL_ROUTE_SET.contains(module)
}

/// A clinical role holding a broad clinical token may enter any clinical module.
pub fn is_broad_clinical_access(actor: &Actor, module: &ModuleKey) -> bool {
    CLINICAL_ROLES.contains(&actor.role())
        && is_clinical_module(module)
        && actor.holds_any(&BROAD_CLINICAL_TOKENS)
}

/// Any actor holding `billing_view` may enter the billing module.
pub fn is_billing_override(actor: &Actor, module: &ModuleKey) -> bool {
    *module == BILLING_MODULE && actor.holds(&BILLING_OVERRIDE_TOKEN)
}

/// The first override that applies, in evaluation order.
pub fn matching_override(actor: &Actor, module: &ModuleKey) -> Option<Override> {
    if is_broad_clinical_access(actor, module) {
        Some(Override::BroadClinical)
    } else if is_billing_override(actor, module) {
        Some(Override::Billing)
    } else {
        None
    }
}
