//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and repositories
//! - Redis counter stores
//! - External API clients

pub mod counters;
pub mod db;
pub mod repositories;

pub use counters::{CounterStore, RedisCounterStore};
pub use db::{Database, Migrator};
pub use repositories::{PostRepository, PostStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use counters::MockCounterStore;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPostRepository, MockUserRepository};
