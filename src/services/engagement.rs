//! Engagement engine - reaction counting across the counter stores and
//! the durable post store.
//!
//! The counter store is the hot path; the durable count fields are a
//! cache-aside mirror of it, reconciled through the reseed rule below
//! rather than any cross-store transaction.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Reaction;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CounterStore, PostRepository};

/// Result of an accepted reaction
#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionOutcome {
    /// Post that was reacted to
    pub post_id: Uuid,
    /// Authoritative count after this reaction
    #[schema(example = 6)]
    pub new_count: i64,
}

/// Engagement service trait for dependency injection.
#[async_trait]
pub trait EngagementService: Send + Sync {
    /// Apply one reaction on behalf of the acting user.
    async fn react(
        &self,
        post_id: Uuid,
        reaction: Reaction,
        actor_id: Uuid,
    ) -> AppResult<ReactionOutcome>;

    /// Best-effort removal of both counter entries after a post is gone.
    ///
    /// Each store's cleanup is isolated: one failure neither blocks the
    /// other nor surfaces to the caller. Orphaned entries are harmless.
    async fn discard_counters(&self, post_id: Uuid);
}

/// Concrete engagement engine over the two counter stores and the
/// durable post store.
pub struct EngagementEngine {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn CounterStore>,
    dislikes: Arc<dyn CounterStore>,
}

impl EngagementEngine {
    /// Create a new engine
    pub fn new(
        posts: Arc<dyn PostRepository>,
        likes: Arc<dyn CounterStore>,
        dislikes: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            posts,
            likes,
            dislikes,
        }
    }

    fn store(&self, reaction: Reaction) -> &dyn CounterStore {
        match reaction {
            Reaction::Like => self.likes.as_ref(),
            Reaction::Dislike => self.dislikes.as_ref(),
        }
    }
}

#[async_trait]
impl EngagementService for EngagementEngine {
    async fn react(
        &self,
        post_id: Uuid,
        reaction: Reaction,
        actor_id: Uuid,
    ) -> AppResult<ReactionOutcome> {
        let post = self.posts.find_by_id(post_id).await?.ok_or_not_found()?;

        // Reacting to your own post is forbidden
        if post.is_authored_by(actor_id) {
            return Err(AppError::Forbidden);
        }

        let store = self.store(reaction);
        let durable_count = post.reaction_count(reaction);

        // Reseed: a cold or evicted counter entry is restored from the
        // durable mirror before incrementing, so prior reactions are not
        // silently reset to one. Reseed and increment are not atomic as a
        // pair; two concurrent first reactions can drift by at most one
        // extra count.
        if store.get(post_id).await?.is_none() && durable_count > 0 {
            tracing::debug!(%post_id, %reaction, durable_count, "Reseeding counter store");
            store.set(post_id, durable_count).await?;
        }

        // A counter failure above or here aborts the reaction before any
        // durable write: the durable field must never show a count the
        // counter store did not actually reach.
        let new_count = store.increment(post_id).await?;

        self.posts
            .update_reaction_count(post_id, reaction, new_count)
            .await?;

        tracing::debug!(%post_id, %reaction, new_count, "Reaction recorded");

        Ok(ReactionOutcome { post_id, new_count })
    }

    async fn discard_counters(&self, post_id: Uuid) {
        let (like_result, dislike_result) = futures::future::join(
            self.likes.delete(post_id),
            self.dislikes.delete(post_id),
        )
        .await;

        for (reaction, result) in [
            (Reaction::Like, like_result),
            (Reaction::Dislike, dislike_result),
        ] {
            if let Err(e) = result {
                tracing::warn!(%post_id, %reaction, error = %e, "Counter cleanup failed, entry orphaned");
            }
        }
    }
}
