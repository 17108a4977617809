//! Access tokens for the admin routes.
//!
//! Tokens are HS256 JWTs signed with the shared secret in [`AuthConfig`]. Issuing tokens is the job of the admin
//! login service. This server only checks them, but can issue them for tooling and tests.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user the token was issued to
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Expiry (Unix timestamp)
    pub exp: i64,
}

impl JwtClaims {
    pub fn has_roles(&self, roles: &[Role]) -> bool {
        roles.iter().all(|r| self.roles.contains(r))
    }
}

pub fn issue_access_token(
    subject: &str,
    roles: &[Role],
    lifetime: Duration,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let claims = JwtClaims { sub: subject.to_string(), roles: roles.to_vec(), exp: (Utc::now() + lifetime).timestamp() };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()))
        .map_err(|e| AuthError::ValidationError(format!("Could not sign the token. {e}")))
}

/// Checks the signature and expiry of an access token and returns its claims.
pub fn decode_access_token(token: &str, config: &AuthConfig) -> Result<JwtClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    let data = decode::<JwtClaims>(token, &key, &Validation::default()).map_err(|e| {
        debug!("💻️ Access token was rejected. {e}");
        AuthError::ValidationError(e.to_string())
    })?;
    Ok(data.claims)
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
