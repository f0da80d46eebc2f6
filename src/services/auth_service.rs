//! Authentication service - token issue/verify and credential checks.
//!
//! Tokens are stateless HS256 JWTs carrying the user's id, username and
//! email. They embed no expiry claim; a verified token is trusted for the
//! identity it names for as long as that user still exists.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

use super::email_verifier::EmailVerifier;

/// JWT claims payload - the asserted identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<User>;

    /// Login and return a bearer token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a token's signature and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a token and resolve the user it names.
    /// Fails with InvalidCredentials if the user no longer exists.
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Encode the identity claims into a signed token.
fn issue_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
    })
}

/// Decode and validate a token's signature.
/// Any structural or signature failure maps to InvalidCredentials.
fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    // No expiry claim is embedded, so expiry validation is off
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )
    .map_err(|_| AppError::InvalidCredentials)?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    email_verifier: EmailVerifier,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, email_verifier: EmailVerifier, config: Config) -> Self {
        Self {
            users,
            email_verifier,
            config,
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, username: String, email: String, password: String) -> AppResult<User> {
        // External deliverability check runs before any local writes
        self.email_verifier.verify_deliverable(&email).await?;

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.users.create(username, email, password_hash).await
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user_result = self.users.find_by_username(&username).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid usernames.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        issue_token(user_result.as_ref().unwrap(), &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        self.users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidCredentials)
    }
}
