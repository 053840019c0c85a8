//! Role and rule audit endpoints.
//!
//! Read-only views of the registry, for checking what a role is configured
//! to see without reading the built-in tables.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use medierp_auth::{Role, UNMODELED_MODULE_DEFAULT};

use crate::app::dto::{ModuleRuleResponse, RoleResponse};
use crate::app::{errors, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:name", get(get_role))
}

/// GET /roles
pub async fn list_roles(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let registry = services.evaluator().registry();
    let roles: Vec<RoleResponse<'_>> = Role::ALL
        .into_iter()
        .map(|role| RoleResponse {
            role,
            configured: registry.has_view(role),
            config: registry.config(role),
        })
        .collect();

    Json(json!({
        "fallback_role": registry.fallback_role(),
        "roles": roles,
    }))
    .into_response()
}

/// GET /roles/:name
pub async fn get_role(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> Response {
    let role = match name.parse::<Role>() {
        Ok(r) => r,
        Err(e) => return errors::json_error(StatusCode::NOT_FOUND, "unknown_role", e.to_string()),
    };

    let registry = services.evaluator().registry();
    Json(RoleResponse {
        role,
        configured: registry.has_view(role),
        config: registry.config(role),
    })
    .into_response()
}

/// GET /rules
///
/// The route rule table. Modules absent from it get `unmodeled_default`.
pub async fn list_rules(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let rules: Vec<ModuleRuleResponse<'_>> = services
        .evaluator()
        .registry()
        .module_rules()
        .into_iter()
        .map(|(module, rule)| ModuleRuleResponse { module, rule })
        .collect();

    Json(json!({
        "unmodeled_default": UNMODELED_MODULE_DEFAULT,
        "rules": rules,
    }))
    .into_response()
}
