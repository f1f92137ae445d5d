/*
 * Responsibility
 * - Users の request/response DTO
 * - password / password_hash は response に含めない
 */
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::user_repo::UserRow;
use crate::services::auth::Role;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub date_of_birth: String,
    pub role: Option<i16>,
}

impl RegisterRequest {
    /// Absent or 0 registers a plain user; SuperAdmin cannot be self-registered.
    pub fn requested_role(&self) -> Result<Role, &'static str> {
        match self.role {
            None | Some(0) => Ok(Role::User),
            Some(value) => Role::try_from(value).map_err(|_| "role is invalid"),
        }
    }

    pub fn parsed_date_of_birth(&self) -> Result<NaiveDate, &'static str> {
        let raw = self.date_of_birth.trim();
        if raw.is_empty() {
            return Err("date_of_birth is required");
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| "date_of_birth must be YYYY-MM-DD")
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(u: UserRow) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            phone_number: u.phone_number,
            date_of_birth: u.date_of_birth,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}
