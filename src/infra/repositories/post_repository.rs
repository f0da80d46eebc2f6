//! Post repository implementation - the durable post store.
//!
//! Reaction count fields are updated with single-field writes so that
//! concurrent like and dislike updates on the same post never clobber
//! each other's field.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::post::{self, ActiveModel, Entity as PostEntity};
use crate::domain::{Post, Reaction};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Post repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find post by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// List posts, newest first, with pagination. Returns (posts, total).
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Post>, u64)>;

    /// Create a new post with both reaction counts at zero
    async fn create(&self, author_id: Uuid, text: String) -> AppResult<Post>;

    /// Replace the post text; bumps modified_at
    async fn update_text(&self, id: Uuid, text: String) -> AppResult<Post>;

    /// Overwrite the durable count field for one reaction kind.
    /// The field is a mirror of the counter store, so last-write-wins
    /// is safe: each write carries a freshly incremented value.
    async fn update_reaction_count(&self, id: Uuid, reaction: Reaction, value: i64)
        -> AppResult<()>;

    /// Hard delete the post
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of PostRepository over SeaORM
pub struct PostStore {
    db: DatabaseConnection,
}

impl PostStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Post::from))
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Post>, u64)> {
        let paginator = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(Post::from).collect(), total))
    }

    async fn create(&self, author_id: Uuid, text: String) -> AppResult<Post> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(author_id),
            text: Set(text),
            amount_of_likes: Set(0),
            amount_of_dislikes: Set(0),
            created_at: Set(now),
            modified_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Post::from(model))
    }

    async fn update_text(&self, id: Uuid, text: String) -> AppResult<Post> {
        let post = PostEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = post.into();
        active.text = Set(text);
        active.modified_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Post::from(model))
    }

    async fn update_reaction_count(
        &self,
        id: Uuid,
        reaction: Reaction,
        value: i64,
    ) -> AppResult<()> {
        let column = match reaction {
            Reaction::Like => post::Column::AmountOfLikes,
            Reaction::Dislike => post::Column::AmountOfDislikes,
        };

        // Single-field update: never touches the other reaction's count
        let result = PostEntity::update_many()
            .col_expr(column, Expr::value(value))
            .col_expr(post::Column::ModifiedAt, Expr::value(chrono::Utc::now()))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
