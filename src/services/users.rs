//! Registration and password login.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::repos::error::RepoError;
use crate::repos::user_repo::{NewUser, UserRow, UserStore};
use crate::services::auth::password::{self, PasswordError};
use crate::services::auth::{IssuedToken, Role, TokenError, TokenService};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),

    #[error("email is already registered")]
    EmailTaken,

    // Unknown e-mail and wrong password share this variant.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("failed to hash password")]
    PasswordHash(#[source] PasswordError),

    #[error("failed to issue token")]
    Token(#[source] TokenError),

    #[error("{op} failed")]
    Store {
        op: &'static str,
        #[source]
        source: RepoError,
    },
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
}

impl RegisterInput {
    fn validate(&self) -> Result<(), UserError> {
        let invalid = |msg: &str| Err(UserError::Validation(msg.to_string()));

        if self.username.trim().is_empty() {
            return invalid("username is required");
        }
        if self.email.trim().is_empty() {
            return invalid("email is required");
        }
        if !self.email.contains('@') {
            return invalid("email must be a valid email address");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return invalid("password must be at least 6 characters");
        }
        if self.phone_number.trim().is_empty() {
            return invalid("phone_number is required");
        }
        if !self.phone_number.trim().chars().all(|c| c.is_ascii_digit()) {
            return invalid("phone_number must be numeric");
        }
        if self.role == Role::SuperAdmin {
            return invalid("role is not allowed");
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub token: IssuedToken,
    pub user: UserRow,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Create an account. The e-mail is stored lower-cased.
    pub async fn register(&self, input: RegisterInput) -> Result<UserRow, UserError> {
        input.validate()?;

        let password_hash =
            password::hash_password(&input.password).map_err(UserError::PasswordHash)?;

        let user = self
            .store
            .create(NewUser {
                username: input.username.trim().to_string(),
                email: normalize_email(&input.email),
                password_hash,
                phone_number: input.phone_number.trim().to_string(),
                date_of_birth: input.date_of_birth,
                role: input.role,
            })
            .await
            .map_err(|e| match e {
                RepoError::Conflict => UserError::EmailTaken,
                other => UserError::Store {
                    op: "create user",
                    source: other,
                },
            })?;

        info!(user_id = user.id, role = ?user.role, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutput, UserError> {
        let email = normalize_email(email);

        let user = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|source| UserError::Store {
                op: "find user",
                source,
            })?
            .ok_or_else(|| {
                warn!("login rejected: unknown email");
                UserError::InvalidCredentials
            })?;

        password::verify_password(password, &user.password_hash).map_err(|_| {
            warn!(user_id = user.id, "login rejected: wrong password");
            UserError::InvalidCredentials
        })?;

        let token = self
            .tokens
            .issue(user.id, user.role)
            .map_err(UserError::Token)?;

        info!(user_id = user.id, "user logged in");
        Ok(LoginOutput { token, user })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
