//! Decision endpoints: route entry, capability flags, CRUD matrix, and an
//! explained route decision for "why was this screen denied?" questions.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::app::dto::{AccessResponse, ActionAccessRequest, ExplainResponse, RouteAccessRequest};
use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::RequestContext;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/route", post(route_access))
        .route("/action", post(action_access))
        .route("/crud", post(crud_access))
        .route("/explain", post(explain_route))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /access/route
pub async fn route_access(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RouteAccessRequest>,
) -> Response {
    let actor = authz::actor_from_claims(&body.actor);
    let allowed = services.can_access_route(actor.as_ref(), &body.path);
    Json(AccessResponse { allowed }).into_response()
}

/// POST /access/action
///
/// `action` is a capability flag such as `can_certify`. Unknown flags are
/// simply denied.
pub async fn action_access(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ActionAccessRequest>,
) -> Response {
    let module = match errors::parse_module(&body.module) {
        Ok(m) => m,
        Err(resp) => return resp,
    };

    let actor = authz::actor_from_claims(&body.actor);
    let allowed = services
        .evaluator()
        .can_perform_action(actor.as_ref(), &module, body.action.trim());

    Json(AccessResponse { allowed }).into_response()
}

/// POST /access/crud
pub async fn crud_access(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ActionAccessRequest>,
) -> Response {
    let module = match errors::parse_module(&body.module) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    let action = match errors::parse_crud_action(&body.action) {
        Ok(a) => a,
        Err(resp) => return resp,
    };

    let actor = authz::actor_from_claims(&body.actor);
    let allowed = services.evaluator().can_crud(actor.as_ref(), action, &module);

    Json(AccessResponse { allowed }).into_response()
}

/// POST /access/explain
///
/// Always evaluated fresh; the explanation carries its own timestamp.
pub async fn explain_route(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<RouteAccessRequest>,
) -> Response {
    let actor = authz::actor_from_claims(&body.actor);
    let explanation = services.evaluator().explain_route(actor.as_ref(), &body.path);

    Json(ExplainResponse {
        request_id: ctx.request_id().to_string(),
        explanation,
    })
    .into_response()
}
