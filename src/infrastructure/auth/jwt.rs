//! JWT token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::User;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create new claims for a user
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user.id().as_str().to_string(),
            username: user.username().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a JWT token for a user
    fn generate(&self, user: &User) -> Result<String, DomainError>;

    /// Validate a JWT token and return the claims
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    /// Get the token expiration time in hours
    fn expiration_hours(&self) -> u64;
}

/// JWT service implementation using an HS256 shared secret
///
/// Token validation is stateless: any component holding the signing key can
/// verify a token without a session store.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Create a JWT service with default configuration
    pub fn with_default_config() -> Self {
        Self::new(JwtConfig::default())
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<String, DomainError> {
        let claims = JwtClaims::new(user, self.config.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let validation = Validation::default();

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::credential(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn test_user() -> User {
        User::new(UserId::new("user-1").unwrap(), "reader", "hash")
    }

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret", 1))
    }

    #[test]
    fn test_generate_and_validate() {
        let service = test_service();
        let user = test_user();

        let token = service.generate(&user).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.user_id(), "user-1");
        assert_eq!(claims.username, "reader");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let service = test_service();

        assert!(service.validate("not-a-token").is_err());
        assert!(service.validate("").is_err());
    }

    #[test]
    fn test_validate_rejects_wrong_secret() {
        let user = test_user();

        let token = JwtService::new(JwtConfig::new("secret-a", 1))
            .generate(&user)
            .unwrap();

        let other = JwtService::new(JwtConfig::new("secret-b", 1));
        let result = other.validate(&token);

        assert!(matches!(result, Err(DomainError::Credential { .. })));
    }

    #[test]
    fn test_expiration_hours() {
        assert_eq!(test_service().expiration_hours(), 1);
        assert_eq!(JwtService::with_default_config().expiration_hours(), 24);
    }
}
