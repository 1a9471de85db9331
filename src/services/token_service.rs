use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use std::fmt;

use crate::errors::{CredentialError, InternalError};
use crate::types::internal::auth::Claims;

/// Access tokens are valid for one working day
const ACCESS_TOKEN_TTL_SECS: i64 = 8 * 60 * 60;

/// Issues and validates HS256 access tokens
pub struct TokenService {
    jwt_secret: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            ttl_secs: ACCESS_TOKEN_TTL_SECS,
        }
    }

    /// Lifetime of issued tokens, reported to clients as `expiresIn`
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Generate a JWT for the given user
    ///
    /// # Arguments
    /// * `user_id` - The id of the user (`sub` claim)
    /// * `role` - Role name at issue time, informational only
    pub fn generate_jwt(&self, user_id: &str, role: Option<&str>) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.map(str::to_string),
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", e.to_string()))
    }

    /// Validate a JWT and return the claims
    ///
    /// # Errors
    /// * `CredentialError::ExpiredToken` - signature fine but past `exp`
    /// * `CredentialError::InvalidToken` - anything else
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken.into(),
            _ => CredentialError::InvalidToken(e.to_string()).into(),
        })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl fmt::Display for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenService {{ ttl: {}s }}", self.ttl_secs)
    }
}
