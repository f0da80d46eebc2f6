//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::{CounterStore, Database};
use crate::services::{AuthService, EngagementService, PostService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Post service
    pub post_service: Arc<dyn PostService>,
    /// Engagement service
    pub engagement_service: Arc<dyn EngagementService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Like counter store (health checks)
    pub likes_store: Arc<dyn CounterStore>,
    /// Dislike counter store (health checks)
    pub dislikes_store: Arc<dyn CounterStore>,
}

impl AppState {
    /// Create application state from infrastructure and config.
    pub fn from_config(
        database: Arc<Database>,
        likes_store: Arc<dyn CounterStore>,
        dislikes_store: Arc<dyn CounterStore>,
        config: crate::config::Config,
    ) -> Self {
        let container = Services::from_parts(
            database.get_connection(),
            likes_store.clone(),
            dislikes_store.clone(),
            config,
        );

        Self {
            auth_service: container.auth(),
            post_service: container.posts(),
            engagement_service: container.engagement(),
            database,
            likes_store,
            dislikes_store,
        }
    }
}
