//! Admin authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::admin::{AdminClaims, LoginResponse, MAX_SESSION_HOURS},
};

// Verified when no usable hash is configured, so failures cost the same time
const FALLBACK_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$0Ek2d1DnSFuSvzgz0WYpGyrm5f5ClQbqQn3tdXKXv2o";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        if config.admin_password_hash.is_empty() {
            tracing::warn!("No admin password hash configured, admin login is disabled");
        }
        if config.jwt_expiration_hours > MAX_SESSION_HOURS {
            tracing::warn!(
                configured = config.jwt_expiration_hours,
                max = MAX_SESSION_HOURS,
                "jwt_expiration_hours exceeds the maximum, sessions are capped"
            );
        }
        Self { config }
    }

    /// Check the admin credential and issue a session token
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let configured = !self.config.admin_password_hash.is_empty();
        let password_ok = self.verify_password(password)?;
        let username_ok = username == self.config.admin_username;

        if !(configured && password_ok && username_ok) {
            tracing::warn!(username = %username, "Failed admin login");
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let claims =
            AdminClaims::new(&self.config.admin_username, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        tracing::info!(username = %username, "Admin logged in");
        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: claims.exp - claims.iat,
        })
    }

    /// Validate a bearer token and require the admin role
    pub fn verify_token(&self, token: &str) -> AppResult<AdminClaims> {
        let claims = AdminClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;
        claims.require_admin()?;
        Ok(claims)
    }

    fn verify_password(&self, password: &str) -> AppResult<bool> {
        let stored = if self.config.admin_password_hash.is_empty() {
            FALLBACK_HASH
        } else {
            self.config.admin_password_hash.as_str()
        };
        let parsed_hash = PasswordHash::new(stored)
            .map_err(|_| AppError::Internal("Invalid admin password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(password: &str) -> AuthService {
        AuthService::new(AuthConfig {
            admin_password_hash: hash_password(password).unwrap(),
            ..AuthConfig::default()
        })
    }

    #[tokio::test]
    async fn test_login_and_verify() {
        let svc = service("correct horse");
        let response = svc.login("admin", "correct horse").await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 12 * 3600);

        let claims = svc.verify_token(&response.token).unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[tokio::test]
    async fn test_wrong_credentials() {
        let svc = service("correct horse");
        assert!(matches!(
            svc.login("admin", "battery staple").await,
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            svc.login("root", "correct horse").await,
            Err(AppError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_login_disabled_without_hash() {
        let svc = AuthService::new(AuthConfig::default());
        assert!(matches!(svc.login("admin", "").await, Err(AppError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_oversized_expiration_is_capped() {
        let svc = AuthService::new(AuthConfig {
            admin_password_hash: hash_password("pw").unwrap(),
            jwt_expiration_hours: u64::MAX,
            ..AuthConfig::default()
        });
        let response = svc.login("admin", "pw").await.unwrap();
        assert_eq!(response.expires_in, (MAX_SESSION_HOURS * 3600) as i64);
        assert!(svc.verify_token(&response.token).is_ok());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = service("pw");
        assert!(matches!(svc.verify_token("not-a-jwt"), Err(AppError::Authentication(_))));
    }
}
