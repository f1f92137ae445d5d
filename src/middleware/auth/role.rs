use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::services::auth::RolePolicy;

/// Role gate. The policy is the layer state:
/// `middleware::from_fn_with_state(ADMIN_ONLY, require_role)`.
/// Must sit inside `authenticate`.
pub async fn require_role(
    State(policy): State<RolePolicy>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !policy.admits(ctx.role) {
        warn!(
            user_id = ctx.user_id,
            role = ?ctx.role,
            path = %req.uri().path(),
            "request rejected: role not allowed"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
