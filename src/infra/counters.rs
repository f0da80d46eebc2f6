//! Counter store adapter - fast per-post reaction counts over Redis.
//!
//! One adapter instance exists per reaction kind, each against its own
//! configured Redis URL and its own key prefix, so like and dislike
//! counts can never collide even when physically colocated.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use uuid::Uuid;

use crate::domain::Reaction;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Key-value contract for one reaction kind's counts.
///
/// `increment` must be a single round-trip atomic operation at the store,
/// never a read-modify-write pair in the caller; that is what keeps
/// concurrent reactions from losing increments.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Live count for the post, or None when no entry exists.
    /// Absent is distinct from zero; the reseed logic depends on it.
    async fn get(&self, post_id: Uuid) -> AppResult<Option<i64>>;

    /// Overwrite the stored count.
    async fn set(&self, post_id: Uuid, value: i64) -> AppResult<()>;

    /// Atomically increment by one and return the new value.
    /// An absent entry increments from zero.
    async fn increment(&self, post_id: Uuid) -> AppResult<i64>;

    /// Remove the entry; succeeds as a no-op when absent.
    async fn delete(&self, post_id: Uuid) -> AppResult<()>;

    /// Check store connectivity.
    async fn ping(&self) -> AppResult<()>;
}

/// Redis-backed counter store with connection pooling.
#[derive(Clone)]
pub struct RedisCounterStore {
    connection: ConnectionManager,
    prefix: &'static str,
}

impl RedisCounterStore {
    /// Connect the counter store for one reaction kind.
    ///
    /// # Panics
    /// Panics if the Redis connection fails.
    pub async fn connect(url: &str, reaction: Reaction) -> Self {
        let client = Client::open(url).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!(reaction = %reaction, "Counter store connected");

        Self {
            connection,
            prefix: reaction.key_prefix(),
        }
    }

    /// Try to connect, returning an error instead of panicking.
    pub async fn try_connect(url: &str, reaction: Reaction) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection,
            prefix: reaction.key_prefix(),
        })
    }

    fn key(&self, post_id: Uuid) -> String {
        format!("{}{}", self.prefix, post_id)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get(&self, post_id: Uuid) -> AppResult<Option<i64>> {
        let mut conn = self.connection.clone();
        let value: Option<i64> = conn.get(self.key(post_id)).await.map_err(counter_error)?;
        Ok(value)
    }

    async fn set(&self, post_id: Uuid, value: i64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(self.key(post_id), value)
            .await
            .map_err(counter_error)?;
        Ok(())
    }

    async fn increment(&self, post_id: Uuid) -> AppResult<i64> {
        let mut conn = self.connection.clone();
        let value: i64 = conn
            .incr(self.key(post_id), 1)
            .await
            .map_err(counter_error)?;
        Ok(value)
    }

    async fn delete(&self, post_id: Uuid) -> AppResult<()> {
        let mut conn = self.connection.clone();
        // DEL on a missing key is already a no-op in Redis
        let _: () = conn.del(self.key(post_id)).await.map_err(counter_error)?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(counter_error)?;
        Ok(())
    }
}

/// Convert Redis error to AppError.
fn counter_error(e: RedisError) -> AppError {
    tracing::error!("Counter store error: {}", e);
    AppError::dependency(format!("counter store: {}", e))
}
