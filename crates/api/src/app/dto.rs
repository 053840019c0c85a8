use serde::{Deserialize, Serialize};

use medierp_auth::{
    ModuleAccessRule, ModuleKey, NavigationSection, Role, RoleViewConfig, RouteDecision,
};

// -------------------------
// Request DTOs
// -------------------------

/// Who is asking. Both fields are optional on the wire; a missing role is an
/// absent actor, not a malformed request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorClaims {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteAccessRequest {
    #[serde(flatten)]
    pub actor: ActorClaims,
    pub path: String,
}

/// Shared by `/access/action` (capability flag) and `/access/crud`
/// (matrix action).
#[derive(Debug, Deserialize)]
pub struct ActionAccessRequest {
    #[serde(flatten)]
    pub actor: ActorClaims,
    pub module: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct NavigationRequest {
    #[serde(flatten)]
    pub actor: ActorClaims,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub request_id: String,
    pub explanation: RouteDecision,
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub sections: Vec<NavigationSection>,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse<'a> {
    pub role: Role,
    /// `false` when `config` is the fallback role's view.
    pub configured: bool,
    pub config: &'a RoleViewConfig,
}

#[derive(Debug, Serialize)]
pub struct ModuleRuleResponse<'a> {
    pub module: &'a ModuleKey,
    pub rule: &'a ModuleAccessRule,
}
