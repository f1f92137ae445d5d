use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::services::auth::role::Role;

// Errors returned by token issuance and verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,
    #[error("access token ttl out of range: {0}s")]
    TtlOutOfRange(u64),
    #[error("failed to sign access token")]
    Signing(#[source] jsonwebtoken::errors::Error),
    // Expired, forged and garbled tokens all end up here.
    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Access token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

/// HS256 access-token issuer and verifier.
///
/// There is no refresh, rotation or revocation: a token stays valid until
/// `exp`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64, leeway_seconds: u64) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .filter(|ttl| *ttl > 0)
            .ok_or(TokenError::TtlOutOfRange(ttl_seconds))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds: ttl,
        })
    }

    /// Issue an access token for `user_id` with `role`, valid for the configured TTL.
    pub fn issue(&self, user_id: i64, role: Role) -> Result<IssuedToken, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let exp = now
            .checked_add(self.ttl_seconds)
            .ok_or(TokenError::TtlOutOfRange(self.ttl_seconds as u64))?;
        let claims = Claims {
            user_id,
            role,
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = self.sign(&claims)?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_seconds as u64,
        })
    }

    /// Verify signature and expiry, then decode the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing(e)
        })
    }
}
