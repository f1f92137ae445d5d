/*
 * Responsibility
 * - POST /users/register, POST /users/login
 * - Admin role での登録だけは Admin / SuperAdmin の bearer token を要求する
 */
use axum::{extract::State, http::HeaderMap};
use tracing::warn;

use crate::{
    api::{
        dto::users::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
        envelope::ApiResponse,
        extractors::JsonBody,
    },
    error::AppError,
    middleware::auth::verify_bearer,
    services::{
        auth::{Role, RolePolicy},
        users::RegisterInput,
    },
    state::AppState,
};

const CAN_REGISTER_ADMINS: RolePolicy = RolePolicy::allow(&[Role::Admin]);

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    let role = req.requested_role().map_err(AppError::bad_request)?;

    if role == Role::Admin {
        let caller = verify_bearer(&state.tokens, &headers)?;
        if !CAN_REGISTER_ADMINS.admits(caller.role) {
            warn!(
                user_id = caller.user_id,
                role = ?caller.role,
                "admin registration rejected: role not allowed"
            );
            return Err(AppError::Forbidden);
        }
    }

    let date_of_birth = req.parsed_date_of_birth().map_err(AppError::bad_request)?;

    let user = state
        .users
        .register(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            phone_number: req.phone_number,
            date_of_birth,
            role,
        })
        .await?;

    Ok(ApiResponse::created(user.into()).with_message("user registered"))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let out = state.users.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: out.token.access_token,
        expires_in: out.token.expires_in,
        user: out.user.into(),
    }))
}
