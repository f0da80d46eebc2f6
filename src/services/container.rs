//! Service container - centralized service construction and access.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{AuthService, Authenticator, EmailVerifier, EngagementEngine, EngagementService,
    PostManager, PostService};
use crate::config::Config;
use crate::infra::{CounterStore, PostStore, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get post service
    fn posts(&self) -> Arc<dyn PostService>;

    /// Get engagement service
    fn engagement(&self) -> Arc<dyn EngagementService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    post_service: Arc<dyn PostService>,
    engagement_service: Arc<dyn EngagementService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        post_service: Arc<dyn PostService>,
        engagement_service: Arc<dyn EngagementService>,
    ) -> Self {
        Self {
            auth_service,
            post_service,
            engagement_service,
        }
    }

    /// Wire all services from the database connection and counter stores
    pub fn from_parts(
        db: DatabaseConnection,
        likes: Arc<dyn CounterStore>,
        dislikes: Arc<dyn CounterStore>,
        config: Config,
    ) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let posts = Arc::new(PostStore::new(db));

        let email_verifier = EmailVerifier::new(config.hunter_api_key.clone());

        let engagement_service: Arc<dyn EngagementService> =
            Arc::new(EngagementEngine::new(posts.clone(), likes, dislikes));
        let auth_service: Arc<dyn AuthService> =
            Arc::new(Authenticator::new(users, email_verifier, config));
        let post_service: Arc<dyn PostService> =
            Arc::new(PostManager::new(posts, engagement_service.clone()));

        Self {
            auth_service,
            post_service,
            engagement_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }

    fn engagement(&self) -> Arc<dyn EngagementService> {
        self.engagement_service.clone()
    }
}
