use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::app::dto::{NavigationRequest, NavigationResponse};
use crate::app::services::AppServices;
use crate::authz;

pub fn router() -> Router {
    Router::new().route("/navigation", post(visible_navigation))
}

/// POST /navigation
///
/// The menu an actor should be shown. Unknown roles get an empty menu.
pub async fn visible_navigation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NavigationRequest>,
) -> Response {
    let actor = authz::actor_from_claims(&body.actor);
    let sections = services.evaluator().visible_navigation(actor.as_ref());
    Json(NavigationResponse { sections }).into_response()
}
