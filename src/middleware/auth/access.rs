//! access token (HS256 JWT) 検証 → AuthCtx を extensions に入れる

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::TokenService;
use crate::state::AppState;

/// Token of an `Authorization: Bearer <token>` header, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extract and verify the bearer token. Expired, forged and garbled tokens
/// are all reported as `Unauthorized`.
pub fn verify_bearer(tokens: &TokenService, headers: &HeaderMap) -> Result<AuthCtx, AppError> {
    let Some(token) = bearer_token(headers) else {
        warn!("request rejected: missing bearer token");
        return Err(AppError::Unauthorized);
    };

    match tokens.verify(token) {
        Ok(claims) => Ok(AuthCtx::from(claims)),
        Err(err) => {
            warn!(error = ?err, "request rejected: access token verification failed");
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = verify_bearer(&state.tokens, req.headers())?;

    info!(
        user_id = auth_ctx.user_id,
        role = ?auth_ctx.role,
        jti = %auth_ctx.jti,
        method = %req.method(),
        path = %req.uri().path(),
        "request authenticated"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
