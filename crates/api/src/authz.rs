use medierp_auth::Actor;

use crate::app::dto::ActorClaims;

/// Resolve the actor a request speaks for.
///
/// Missing or unrecognized roles resolve to `None`; the evaluator treats that
/// as an absent actor and denies everything. This is never an HTTP error.
pub fn actor_from_claims(claims: &ActorClaims) -> Option<Actor> {
    let role = claims.role.as_deref()?;
    Actor::from_claims(role, claims.permissions.as_slice())
}
