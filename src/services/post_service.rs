//! Post service - post CRUD with ownership-gated mutation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Post;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::PostRepository;
use crate::types::PaginationParams;

use super::engagement::EngagementService;

/// Post service trait for dependency injection.
#[async_trait]
pub trait PostService: Send + Sync {
    /// Create a new post; both reaction counts start at zero
    async fn create_post(&self, author_id: Uuid, text: String) -> AppResult<Post>;

    /// Get a post by ID
    async fn get_post(&self, id: Uuid) -> AppResult<Post>;

    /// List posts, newest first. Returns (posts, total).
    async fn list_posts(&self, params: &PaginationParams) -> AppResult<(Vec<Post>, u64)>;

    /// Edit the post text; only the author may edit
    async fn edit_post(&self, id: Uuid, actor_id: Uuid, text: String) -> AppResult<Post>;

    /// Delete the post; only the author may delete. Counter entries are
    /// removed best-effort after the durable delete succeeds.
    async fn delete_post(&self, id: Uuid, actor_id: Uuid) -> AppResult<Uuid>;
}

/// Concrete implementation of PostService.
pub struct PostManager {
    posts: Arc<dyn PostRepository>,
    engagement: Arc<dyn EngagementService>,
}

impl PostManager {
    /// Create new post service instance
    pub fn new(posts: Arc<dyn PostRepository>, engagement: Arc<dyn EngagementService>) -> Self {
        Self { posts, engagement }
    }

    /// Fetch a post and require that the actor authored it.
    async fn fetch_owned(&self, id: Uuid, actor_id: Uuid) -> AppResult<Post> {
        let post = self.posts.find_by_id(id).await?.ok_or_not_found()?;

        if !post.is_authored_by(actor_id) {
            return Err(AppError::Forbidden);
        }

        Ok(post)
    }
}

#[async_trait]
impl PostService for PostManager {
    async fn create_post(&self, author_id: Uuid, text: String) -> AppResult<Post> {
        self.posts.create(author_id, text).await
    }

    async fn get_post(&self, id: Uuid) -> AppResult<Post> {
        self.posts.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_posts(&self, params: &PaginationParams) -> AppResult<(Vec<Post>, u64)> {
        self.posts.list(params).await
    }

    async fn edit_post(&self, id: Uuid, actor_id: Uuid, text: String) -> AppResult<Post> {
        self.fetch_owned(id, actor_id).await?;
        self.posts.update_text(id, text).await
    }

    async fn delete_post(&self, id: Uuid, actor_id: Uuid) -> AppResult<Uuid> {
        self.fetch_owned(id, actor_id).await?;

        // Durable delete first; counter cleanup is best-effort afterwards
        // and can never fail the operation.
        self.posts.delete(id).await?;
        self.engagement.discard_counters(id).await;

        tracing::info!(post_id = %id, "Post deleted");

        Ok(id)
    }
}
