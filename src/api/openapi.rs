//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, post_handler};
use crate::domain::{PostResponse, Reaction, UserResponse};
use crate::services::{ReactionOutcome, TokenResponse};

/// OpenAPI documentation for Postboard
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postboard",
        version = "0.1.0",
        description = "A social posting API with Redis-backed like/dislike counters",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Post endpoints
        post_handler::list_posts,
        post_handler::get_post,
        post_handler::create_post,
        post_handler::edit_post,
        post_handler::delete_post,
        // Reaction endpoints
        post_handler::like_post,
        post_handler::dislike_post,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            PostResponse,
            Reaction,
            ReactionOutcome,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            TokenResponse,
            // Post handler types
            post_handler::CreatePostRequest,
            post_handler::UpdatePostRequest,
            post_handler::DeletedPostResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Posts", description = "Post management operations"),
        (name = "Reactions", description = "Like and dislike counters")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
