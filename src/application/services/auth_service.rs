//! Authentication Service
//!
//! Password hashing, login and JWT issuing/validation.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::dto::LoginResponse;
use crate::config::JwtSettings;
use crate::domain::{Collection, DocumentStore, Role, StoreError};
use crate::shared::error::AppError;
use crate::shared::json::{document_id, redact_password};

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Authenticate with email and password
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError>;

    /// Validate an access token and return its claims
    fn validate_token(&self, token: &str) -> Result<Claims, AuthError>;

    /// Load the (redacted) user a token was issued to
    async fn current_user(&self, user_id: &str) -> Result<Value, AuthError>;
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role at the time of login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized("Invalid email or password".into()),
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
            AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::Store(e) => AppError::Store(e),
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against the stored value.
///
/// Rows seeded by hand hold the plain password; anything that doesn't parse as
/// a PHC string is compared verbatim.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => !stored.is_empty() && stored == password,
    }
}

/// Decode and validate an access token
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })
}

/// AuthService implementation
pub struct AuthServiceImpl {
    store: Arc<dyn DocumentStore>,
    jwt_settings: JwtSettings,
}

impl AuthServiceImpl {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_settings: JwtSettings) -> Self {
        Self {
            store,
            jwt_settings,
        }
    }

    /// Issue an access token for a user
    fn generate_token(&self, user_id: &str, role: Option<Role>) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (now + Duration::minutes(self.jwt_settings.expiry_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let wanted = email.trim().to_lowercase();
        let users = self.store.list(Collection::Users, &[]).await?;

        // Matched on the raw rows so an account with an unexpected role or
        // extra fields can still sign in.
        let user = users
            .into_iter()
            .find(|u| {
                u.get("email")
                    .and_then(Value::as_str)
                    .is_some_and(|e| e.trim().to_lowercase() == wanted)
            })
            .ok_or(AuthError::InvalidCredentials)?;

        let stored = user.get("password").and_then(Value::as_str).unwrap_or_default();
        if !verify_password(password, stored) {
            tracing::info!(email = %wanted, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user_id = document_id(&user).ok_or(AuthError::InvalidCredentials)?;
        let role = user
            .get("role")
            .and_then(|role| serde_json::from_value::<Role>(role.clone()).ok());
        if role.is_none() {
            tracing::warn!(user_id = %user_id, role = ?user.get("role"), "User has no recognised role");
        }

        let token = self.generate_token(&user_id, role)?;
        tracing::info!(user_id = %user_id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer",
            expires_in: self.jwt_settings.expiry_minutes * 60,
            user: redact_password(user),
        })
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_token(&self.jwt_settings.secret, token)
    }

    async fn current_user(&self, user_id: &str) -> Result<Value, AuthError> {
        self.store
            .get(Collection::Users, user_id)
            .await?
            .map(redact_password)
            .ok_or(AuthError::UserNotFound)
    }
}
