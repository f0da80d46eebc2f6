//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::domain::Reaction;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, RedisCounterStore};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize database
    let db = Arc::new(Database::connect(&config).await);
    tracing::info!("Database connected");

    // Initialize the two counter stores, one per reaction kind
    let likes_store = Arc::new(RedisCounterStore::connect(&config.redis_likes_url, Reaction::Like).await);
    let dislikes_store =
        Arc::new(RedisCounterStore::connect(&config.redis_dislikes_url, Reaction::Dislike).await);
    tracing::info!("Counter stores connected");

    // Create application state with centralized service container
    let app_state = AppState::from_config(db, likes_store, dislikes_store, config);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
