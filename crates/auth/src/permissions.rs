use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// The universal token: an actor holding it is granted every permission.
pub const WILDCARD: &str = "*";

/// Fine-grained capability grant, independent of the actor's role.
///
/// Tokens are opaque strings (e.g. `"medical_view"`). The wildcard `"*"`
/// means "all permissions granted".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionToken(Cow<'static, str>);

impl PermissionToken {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub const fn wildcard() -> Self {
        Self::from_static(WILDCARD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == WILDCARD
    }
}

impl core::fmt::Display for PermissionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tokens issued by the identity provider for MediERP screens.
pub mod tokens {
    use super::PermissionToken;

    pub const MEDICAL_VIEW: PermissionToken = PermissionToken::from_static("medical_view");
    pub const PATIENTS_VIEW: PermissionToken = PermissionToken::from_static("patients_view");
    pub const PATIENTS_MANAGE: PermissionToken = PermissionToken::from_static("patients_manage");
    pub const APPOINTMENTS_VIEW: PermissionToken =
        PermissionToken::from_static("appointments_view");
    pub const APPOINTMENTS_MANAGE: PermissionToken =
        PermissionToken::from_static("appointments_manage");
    pub const EXAMS_MANAGE: PermissionToken = PermissionToken::from_static("exams_manage");
    pub const CERTIFICATES_MANAGE: PermissionToken =
        PermissionToken::from_static("certificates_manage");
    pub const BILLING_VIEW: PermissionToken = PermissionToken::from_static("billing_view");
    pub const BILLING_MANAGE: PermissionToken = PermissionToken::from_static("billing_manage");
    pub const INVENTORY_VIEW: PermissionToken = PermissionToken::from_static("inventory_view");
    pub const INVENTORY_MANAGE: PermissionToken = PermissionToken::from_static("inventory_manage");
    pub const REPORTS_VIEW: PermissionToken = PermissionToken::from_static("reports_view");
    pub const SURVEYS_VIEW: PermissionToken = PermissionToken::from_static("surveys_view");
    pub const SURVEYS_MANAGE: PermissionToken = PermissionToken::from_static("surveys_manage");
    pub const USERS_MANAGE: PermissionToken = PermissionToken::from_static("users_manage");
    pub const SETTINGS_MANAGE: PermissionToken = PermissionToken::from_static("settings_manage");
}
