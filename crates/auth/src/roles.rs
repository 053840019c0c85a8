use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse-grained identity class of an actor.
///
/// Closed set: every role has exactly one view configuration in the registry,
/// and adding a variant forces the built-in tables to be extended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator. Bypasses every route rule.
    SuperAdmin,
    /// Administrator of a single clinic/company.
    CompanyAdmin,
    /// Physician performing consultations, exams and certifications.
    Clinician,
    Nurse,
    /// Reception: scheduling, patient intake, cash desk.
    FrontDesk,
    Billing,
    /// Patient portal user. Least privileged.
    Patient,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 7] = [
        Role::SuperAdmin,
        Role::CompanyAdmin,
        Role::Clinician,
        Role::Nurse,
        Role::FrontDesk,
        Role::Billing,
        Role::Patient,
    ];

    /// Role whose holders are granted every route.
    pub const TOP: Role = Role::SuperAdmin;

    /// Role whose view is used when another role has none configured.
    pub const LEAST_PRIVILEGED: Role = Role::Patient;

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::CompanyAdmin => "company_admin",
            Role::Clinician => "clinician",
            Role::Nurse => "nurse",
            Role::FrontDesk => "front_desk",
            Role::Billing => "billing",
            Role::Patient => "patient",
        }
    }

    pub fn is_top(&self) -> bool {
        *self == Self::TOP
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    /// Accepts the snake_case wire name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(" Front_Desk ".parse::<Role>(), Ok(Role::FrontDesk));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "janitor".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role 'janitor'");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::CompanyAdmin).unwrap();
        assert_eq!(json, "\"company_admin\"");
        let back: Role = serde_json::from_str("\"nurse\"").unwrap();
        assert_eq!(back, Role::Nurse);
    }
}
