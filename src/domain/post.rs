//! Post domain entity and the ownership rules attached to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Reaction;

/// Post domain entity.
///
/// `amount_of_likes` and `amount_of_dislikes` mirror the counter stores:
/// they hold the last value the engagement engine successfully wrote, and
/// they are what clients see when a counter store is cold or unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// Author reference, immutable once created
    pub author_id: Uuid,
    pub text: String,
    pub amount_of_likes: i64,
    pub amount_of_dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Post {
    /// Ownership predicate: true iff the given user authored this post.
    ///
    /// Edit and delete require ownership; like and dislike require
    /// NON-ownership (a user may not react to their own post).
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// Durable count mirrored for the given reaction kind.
    pub fn reaction_count(&self, reaction: Reaction) -> i64 {
        match reaction {
            Reaction::Like => self.amount_of_likes,
            Reaction::Dislike => self.amount_of_dislikes,
        }
    }
}

/// Post response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    /// Unique post identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Author user identifier
    pub author_id: Uuid,
    /// Post text content
    #[schema(example = "Hello, world")]
    pub text: String,
    /// Like count last synced from the counter store
    #[schema(example = 3)]
    pub amount_of_likes: i64,
    /// Dislike count last synced from the counter store
    #[schema(example = 0)]
    pub amount_of_dislikes: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            text: post.text,
            amount_of_likes: post.amount_of_likes,
            amount_of_dislikes: post.amount_of_dislikes,
            created_at: post.created_at,
            modified_at: post.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(author_id: Uuid) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            author_id,
            text: "hello".to_string(),
            amount_of_likes: 2,
            amount_of_dislikes: 1,
            created_at: now,
            modified_at: now,
        }
    }

    #[test]
    fn test_ownership_predicate() {
        let author = Uuid::new_v4();
        let post = sample_post(author);

        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }

    #[test]
    fn test_reaction_count_selects_matching_field() {
        let post = sample_post(Uuid::new_v4());

        assert_eq!(post.reaction_count(Reaction::Like), 2);
        assert_eq!(post.reaction_count(Reaction::Dislike), 1);
    }
}
