use axum::{Router, routing::get};

pub mod access;
pub mod navigation;
pub mod roles;
pub mod system;

/// Router for every policy endpoint except `/health`.
pub fn router() -> Router {
    Router::new()
        .nest("/access", access::router())
        .merge(navigation::router())
        .merge(roles::router())
        .route("/rules", get(roles::list_rules))
}
