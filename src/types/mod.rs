//! Shared types across API handlers.

mod pagination;

pub use pagination::{Paginated, PaginationMeta, PaginationParams};
