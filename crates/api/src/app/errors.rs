use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use medierp_auth::{CrudAction, ModuleKey};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Strict module key for action endpoints; paths are not accepted here.
pub fn parse_module(s: &str) -> Result<ModuleKey, axum::response::Response> {
    ModuleKey::parse(s)
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_module", e.to_string()))
}

pub fn parse_crud_action(s: &str) -> Result<CrudAction, axum::response::Response> {
    s.parse::<CrudAction>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_action", e.to_string()))
}
