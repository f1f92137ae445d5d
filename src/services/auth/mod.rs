pub mod password;
pub mod role;
pub mod token_service;

pub use role::{Role, RolePolicy};
pub use token_service::{Claims, IssuedToken, TokenError, TokenService};
