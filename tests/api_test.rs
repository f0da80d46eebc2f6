//! Integration tests for the authentication flow and API types.
//!
//! These tests run the real authentication service against an in-memory
//! user repository, so registration, login, and token verification are
//! exercised end to end without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use uuid::Uuid;

use postboard::config::Config;
use postboard::domain::{Reaction, User};
use postboard::errors::{AppError, AppResult};
use postboard::infra::UserRepository;
use postboard::services::{AuthService, Authenticator, EmailVerifier};

// =============================================================================
// In-Memory User Repository
// =============================================================================

#[derive(Default)]
struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn remove(&self, id: Uuid) {
        self.users.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };

        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }
}

fn auth_service(users: Arc<InMemoryUserRepository>) -> Authenticator {
    Authenticator::new(users, EmailVerifier::disabled(), Config::for_tests())
}

// =============================================================================
// Registration Tests
// =============================================================================

#[tokio::test]
async fn test_register_creates_user_with_hashed_password() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    let user = auth
        .register(
            "jdoe".to_string(),
            "jdoe@example.com".to_string(),
            "correct-horse-battery".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(user.username, "jdoe");
    // The stored hash must never be the plain password
    assert_ne!(user.password_hash, "correct-horse-battery");
}

#[tokio::test]
async fn test_register_duplicate_username_is_conflict() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    auth.register(
        "jdoe".to_string(),
        "jdoe@example.com".to_string(),
        "correct-horse-battery".to_string(),
    )
    .await
    .unwrap();

    let result = auth
        .register(
            "jdoe".to_string(),
            "other@example.com".to_string(),
            "another-password".to_string(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    let result = auth
        .register(
            "jdoe".to_string(),
            "jdoe@example.com".to_string(),
            "short".to_string(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

// =============================================================================
// Login and Token Tests
// =============================================================================

#[tokio::test]
async fn test_login_then_authenticate_resolves_user() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    let registered = auth
        .register(
            "jdoe".to_string(),
            "jdoe@example.com".to_string(),
            "correct-horse-battery".to_string(),
        )
        .await
        .unwrap();

    let token = auth
        .login("jdoe".to_string(), "correct-horse-battery".to_string())
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    let resolved = auth.authenticate(&token.access_token).await.unwrap();
    assert_eq!(resolved.id, registered.id);
    assert_eq!(resolved.username, "jdoe");
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    auth.register(
        "jdoe".to_string(),
        "jdoe@example.com".to_string(),
        "correct-horse-battery".to_string(),
    )
    .await
    .unwrap();

    let result = auth
        .login("jdoe".to_string(), "wrong-password".to_string())
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_with_unknown_username_fails() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    let result = auth
        .login("ghost".to_string(), "whatever-password".to_string())
        .await;

    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_token_for_removed_user_is_rejected() {
    let users = InMemoryUserRepository::new();
    let auth = auth_service(users.clone());

    let registered = auth
        .register(
            "jdoe".to_string(),
            "jdoe@example.com".to_string(),
            "correct-horse-battery".to_string(),
        )
        .await
        .unwrap();

    let token = auth
        .login("jdoe".to_string(), "correct-horse-battery".to_string())
        .await
        .unwrap();

    // Token stays structurally valid, but the identity it names is gone
    users.remove(registered.id);

    let result = auth.authenticate(&token.access_token).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound, StatusCode::NOT_FOUND),
        (AppError::conflict("User"), StatusCode::CONFLICT),
        (AppError::validation("bad input"), StatusCode::BAD_REQUEST),
        (
            AppError::dependency("counter store: unreachable"),
            StatusCode::BAD_GATEWAY,
        ),
        (
            AppError::internal("boom"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        let response = error.into_response();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_dependency_error_hides_internal_detail() {
    let response = AppError::dependency("counter store: redis://secret-host refused").into_response();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["error"]["code"], "DEPENDENCY_ERROR");
    let message = json["error"]["message"].as_str().unwrap();
    assert!(!message.contains("secret-host"));
}

// =============================================================================
// Domain Type Tests
// =============================================================================

#[tokio::test]
async fn test_reaction_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Reaction::Like).unwrap(), "\"like\"");
    assert_eq!(
        serde_json::to_string(&Reaction::Dislike).unwrap(),
        "\"dislike\""
    );
}

#[tokio::test]
async fn test_user_response_hides_password_hash() {
    let user = User {
        id: Uuid::new_v4(),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        password_hash: "super-secret-hash".to_string(),
        created_at: Utc::now(),
    };

    let json = serde_json::to_string(&user).unwrap();
    assert!(!json.contains("super-secret-hash"));
}
