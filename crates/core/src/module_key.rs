//! Business-area identifiers and route normalization.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Routing prefix under which every screen of the application is mounted.
pub const ROUTE_PREFIX: &str = "dashboard";

/// Module a path resolves to when nothing else can be extracted from it.
pub const DEFAULT_MODULE: &str = "dashboard";

/// Normalized identifier of a business area (e.g. `pacientes`, `facturacion`).
///
/// This is the unit of access control: every route maps to exactly one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(Cow<'static, str>);

impl ModuleKey {
    /// Build a key from a compile-time literal.
    ///
    /// The literal is trusted to already be normalized; static tables use this.
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn dashboard() -> Self {
        Self::from_static(DEFAULT_MODULE)
    }

    /// Normalize a route path into the module it belongs to.
    ///
    /// - query string and fragment are ignored
    /// - empty segments and surrounding whitespace are ignored
    /// - a leading [`ROUTE_PREFIX`] segment is stripped
    /// - the first remaining segment (ASCII-lowercased) is the module
    /// - nothing left means [`DEFAULT_MODULE`]
    ///
    /// Never fails, and `from_path(k.as_str()) == k` for any key it returns.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let mut segments = path
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .peekable();

        if segments
            .peek()
            .is_some_and(|s| s.eq_ignore_ascii_case(ROUTE_PREFIX))
        {
            segments.next();
        }

        match segments.next() {
            Some(segment) => Self(Cow::Owned(segment.to_ascii_lowercase())),
            None => Self::dashboard(),
        }
    }

    /// Strictly parse an already-normalized key (`[a-z0-9_]+`).
    ///
    /// Used where a key is supplied directly rather than derived from a path.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::invalid_id("ModuleKey: empty"));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
        {
            return Err(DomainError::invalid_id(format!(
                "ModuleKey: '{raw}' must match [a-z0-9_]+"
            )));
        }
        Ok(Self(Cow::Owned(raw.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_routing_prefix() {
        assert_eq!(ModuleKey::from_path("/dashboard/pacientes").as_str(), "pacientes");
        assert_eq!(ModuleKey::from_path("dashboard/pacientes/42/editar").as_str(), "pacientes");
        assert_eq!(ModuleKey::from_path("pacientes").as_str(), "pacientes");
    }

    #[test]
    fn empty_and_prefix_only_paths_default_to_dashboard() {
        for path in ["", "/", "   ", "/dashboard", "/dashboard/", "//", "?tab=1", "#top"] {
            assert_eq!(ModuleKey::from_path(path), ModuleKey::dashboard(), "path {path:?}");
        }
    }

    #[test]
    fn ignores_query_fragment_and_case() {
        assert_eq!(
            ModuleKey::from_path("/Dashboard/Facturacion?page=2#row-4").as_str(),
            "facturacion"
        );
        assert_eq!(ModuleKey::from_path("/examenes/ ").as_str(), "examenes");
    }

    #[test]
    fn prefix_must_be_a_whole_segment() {
        assert_eq!(ModuleKey::from_path("/dashboards/citas").as_str(), "dashboards");
    }

    #[test]
    fn parse_rejects_non_normalized_keys() {
        assert!(ModuleKey::parse("certificaciones").is_ok());
        assert!(ModuleKey::parse("").is_err());
        assert!(ModuleKey::parse("Pacientes").is_err());
        assert!(ModuleKey::parse("a/b").is_err());
        assert!(matches!(ModuleKey::parse("Pacientes"), Err(DomainError::InvalidId(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: normalizing the key a path produced yields the same key.
        #[test]
        fn normalization_is_idempotent(path in "[ a-zA-Z0-9_/?#.-]{0,40}") {
            let key = ModuleKey::from_path(&path);
            prop_assert_eq!(ModuleKey::from_path(key.as_str()), key.clone());
            prop_assert_eq!(ModuleKey::from_path(&format!("/dashboard/{}", key)), key);
        }

        /// Property: the same path always yields the same key.
        #[test]
        fn normalization_is_deterministic(path in ".{0,40}") {
            prop_assert_eq!(ModuleKey::from_path(&path), ModuleKey::from_path(&path));
        }
    }
}
