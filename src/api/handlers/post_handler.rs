//! Post handlers - CRUD plus like/dislike reactions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{PostResponse, Reaction};
use crate::errors::AppResult;
use crate::services::ReactionOutcome;
use crate::types::{Paginated, PaginationParams};

/// Post creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    /// Post text content
    #[validate(length(min = 1, max = 10000, message = "Text must be 1 to 10000 characters"))]
    #[schema(example = "Hello, world")]
    pub text: String,
}

/// Post edit request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    /// Replacement text content
    #[validate(length(min = 1, max = 10000, message = "Text must be 1 to 10000 characters"))]
    #[schema(example = "Hello again")]
    pub text: String,
}

/// Deletion confirmation
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedPostResponse {
    /// Identifier of the deleted post
    pub post_id: Uuid,
}

/// Create post routes (all require authentication)
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post))
        .route("/:id", put(edit_post).delete(delete_post))
        .route("/:id/like", post(like_post))
        .route("/:id/dislike", post(dislike_post))
}

/// List posts, newest first
#[utoipa::path(
    get,
    path = "/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated list of posts"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<PostResponse>>> {
    let (posts, total) = state.post_service.list_posts(&params).await?;
    let data = posts.into_iter().map(PostResponse::from).collect();

    Ok(Json(Paginated::new(data, params.page, params.limit(), total)))
}

/// Get a single post
#[utoipa::path(
    get,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "Post not found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.get_post(id).await?;
    Ok(Json(PostResponse::from(post)))
}

/// Create a new post
#[utoipa::path(
    post,
    path = "/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<PostResponse>)> {
    let post = state.post_service.create_post(user.id, payload.text).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

/// Edit a post's text (author only)
#[utoipa::path(
    put,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> AppResult<Json<PostResponse>> {
    let post = state
        .post_service
        .edit_post(id, user.id, payload.text)
        .await?;

    Ok(Json(PostResponse::from(post)))
}

/// Delete a post (author only); counter entries are cleaned up best-effort
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post deleted", body = DeletedPostResponse),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeletedPostResponse>> {
    let post_id = state.post_service.delete_post(id, user.id).await?;

    Ok(Json(DeletedPostResponse { post_id }))
}

/// Like a post (non-authors only)
#[utoipa::path(
    post,
    path = "/posts/{id}/like",
    tag = "Reactions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Like recorded", body = ReactionOutcome),
        (status = 403, description = "Authors cannot react to their own posts"),
        (status = 404, description = "Post not found"),
        (status = 502, description = "Counter store unavailable")
    )
)]
pub async fn like_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReactionOutcome>> {
    let outcome = state
        .engagement_service
        .react(id, Reaction::Like, user.id)
        .await?;

    Ok(Json(outcome))
}

/// Dislike a post (non-authors only)
#[utoipa::path(
    post,
    path = "/posts/{id}/dislike",
    tag = "Reactions",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Dislike recorded", body = ReactionOutcome),
        (status = 403, description = "Authors cannot react to their own posts"),
        (status = 404, description = "Post not found"),
        (status = 502, description = "Counter store unavailable")
    )
)]
pub async fn dislike_post(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReactionOutcome>> {
    let outcome = state
        .engagement_service
        .react(id, Reaction::Dislike, user.id)
        .await?;

    Ok(Json(outcome))
}
