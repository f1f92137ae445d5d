//! Roles carried in access tokens and the per-route role policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of roles.
///
/// The integer discriminants are the wire/storage representation (SMALLINT
/// column, `role` claim). `SuperAdmin` passes every role check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Role {
    SuperAdmin = 0,
    Admin = 1,
    User = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub i16);

impl TryFrom<i16> for Role {
    type Error = UnknownRole;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SuperAdmin),
            1 => Ok(Self::Admin),
            2 => Ok(Self::User),
            other => Err(UnknownRole(other)),
        }
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> Self {
        role as i16
    }
}

/// Allowed-role set declared by a role-gated route.
#[derive(Debug, Clone, Copy)]
pub struct RolePolicy {
    allowed: &'static [Role],
}

impl RolePolicy {
    pub const fn allow(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    pub fn admits(&self, role: Role) -> bool {
        match role {
            Role::SuperAdmin => true,
            Role::Admin | Role::User => self.allowed.contains(&role),
        }
    }
}
