//! HTTP request handlers.

pub mod auth_handler;
pub mod post_handler;

pub use auth_handler::auth_routes;
pub use post_handler::post_routes;
