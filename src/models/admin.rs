//! Admin session models

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const ADMIN_ROLE: &str = "admin";

/// Longest session a token may grant (one year)
pub const MAX_SESSION_HOURS: u64 = 24 * 365;

/// JWT claims carried by an admin session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl AdminClaims {
    /// Claims valid for `ttl_hours`, clamped to `MAX_SESSION_HOURS`
    pub fn new(username: &str, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let hours = ttl_hours.min(MAX_SESSION_HOURS) as i64;
        let ttl = Duration::try_hours(hours).unwrap_or_else(Duration::zero);
        Self {
            sub: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: now.checked_add_signed(ttl).unwrap_or(now).timestamp(),
        }
    }

    /// Create a signed JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.role == ADMIN_ROLE {
            Ok(())
        } else {
            Err(AppError::Authentication(format!("Role '{}' is not admin", self.role)))
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Current session summary
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionInfo {
    pub username: String,
    pub role: String,
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip_and_wrong_secret() {
        let claims = AdminClaims::new("admin", 1);
        let token = claims.create_token("s3cret").unwrap();

        let parsed = AdminClaims::from_token(&token, "s3cret").unwrap();
        assert_eq!(parsed.sub, "admin");
        assert!(parsed.require_admin().is_ok());

        assert!(AdminClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let claims = AdminClaims::new("admin", u64::MAX);
        assert_eq!(claims.exp - claims.iat, (MAX_SESSION_HOURS * 3600) as i64);

        let claims = AdminClaims::new("admin", 12);
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
    }

    #[test]
    fn test_non_admin_role_rejected() {
        let mut claims = AdminClaims::new("visitor", 1);
        claims.role = "guest".to_string();
        assert!(matches!(claims.require_admin(), Err(AppError::Authentication(_))));
    }
}
