//! Admin authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::admin::{Admin, AdminClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate an admin and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, Admin)> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Please enter both username and password".to_string(),
            ));
        }

        let admin = self
            .repository
            .admins
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&admin.password, password)? {
            tracing::warn!(username = %admin.username, "Failed login attempt");
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: admin.username.clone(),
            admin_id: admin.id,
            full_name: admin.full_name.clone(),
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(admin_id = admin.id, "Admin logged in");
        Ok((token, admin))
    }

    pub async fn get_admin(&self, id: i32) -> AppResult<Admin> {
        self.repository.admins.get_by_id(id).await
    }

    /// Create the configured bootstrap admin when no admin exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.admins.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password(&self.config.bootstrap_password)?;
        let admin = self
            .repository
            .admins
            .create(&self.config.bootstrap_username, &hash, "Administrator")
            .await?;

        tracing::warn!(
            username = %admin.username,
            "Created bootstrap admin account; change its password"
        );
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
