//! Integration tests for the engagement flow.
//!
//! These tests wire the real engagement engine and post service against
//! in-memory fakes of the durable store and the two counter stores, so
//! the full reaction protocol runs without Postgres or Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use postboard::domain::{Post, Reaction};
use postboard::errors::{AppError, AppResult};
use postboard::infra::{CounterStore, PostRepository};
use postboard::services::{EngagementEngine, EngagementService, PostManager, PostService};
use postboard::types::PaginationParams;

// =============================================================================
// In-Memory Fakes
// =============================================================================

/// In-memory counter store backed by a HashMap; can be flipped into a
/// failing state to simulate an unreachable Redis.
#[derive(Default)]
struct InMemoryCounterStore {
    counts: Mutex<HashMap<Uuid, i64>>,
    unavailable: AtomicBool,
}

impl InMemoryCounterStore {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn stored(&self, post_id: Uuid) -> Option<i64> {
        self.counts.lock().unwrap().get(&post_id).copied()
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::dependency("counter store: unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, post_id: Uuid) -> AppResult<Option<i64>> {
        self.check_available()?;
        Ok(self.stored(post_id))
    }

    async fn set(&self, post_id: Uuid, value: i64) -> AppResult<()> {
        self.check_available()?;
        self.counts.lock().unwrap().insert(post_id, value);
        Ok(())
    }

    async fn increment(&self, post_id: Uuid) -> AppResult<i64> {
        self.check_available()?;
        let mut counts = self.counts.lock().unwrap();
        let entry = counts.entry(post_id).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn delete(&self, post_id: Uuid) -> AppResult<()> {
        self.check_available()?;
        self.counts.lock().unwrap().remove(&post_id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        self.check_available()
    }
}

/// In-memory post repository backed by a HashMap.
#[derive(Default)]
struct InMemoryPostRepository {
    posts: Mutex<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn stored(&self, post_id: Uuid) -> Option<Post> {
        self.posts.lock().unwrap().get(&post_id).cloned()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        Ok(self.stored(id))
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Post>, u64)> {
        let posts = self.posts.lock().unwrap();
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = all.len() as u64;
        let start = (params.page.saturating_sub(1) * params.limit()) as usize;
        let page: Vec<Post> = all
            .into_iter()
            .skip(start)
            .take(params.limit() as usize)
            .collect();

        Ok((page, total))
    }

    async fn create(&self, author_id: Uuid, text: String) -> AppResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            text,
            amount_of_likes: 0,
            amount_of_dislikes: 0,
            created_at: now,
            modified_at: now,
        };

        self.posts.lock().unwrap().insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_text(&self, id: Uuid, text: String) -> AppResult<Post> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(&id).ok_or(AppError::NotFound)?;
        post.text = text;
        post.modified_at = Utc::now();
        Ok(post.clone())
    }

    async fn update_reaction_count(
        &self,
        id: Uuid,
        reaction: Reaction,
        value: i64,
    ) -> AppResult<()> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts.get_mut(&id).ok_or(AppError::NotFound)?;
        match reaction {
            Reaction::Like => post.amount_of_likes = value,
            Reaction::Dislike => post.amount_of_dislikes = value,
        }
        post.modified_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut posts = self.posts.lock().unwrap();
        posts.remove(&id).ok_or(AppError::NotFound)?;
        Ok(())
    }
}

// =============================================================================
// Test Harness
// =============================================================================

struct Harness {
    posts: Arc<InMemoryPostRepository>,
    likes: Arc<InMemoryCounterStore>,
    dislikes: Arc<InMemoryCounterStore>,
    engagement: Arc<EngagementEngine>,
    post_service: PostManager,
}

impl Harness {
    fn new() -> Self {
        let posts = InMemoryPostRepository::new();
        let likes = InMemoryCounterStore::new();
        let dislikes = InMemoryCounterStore::new();

        let engagement = Arc::new(EngagementEngine::new(
            posts.clone() as Arc<dyn PostRepository>,
            likes.clone() as Arc<dyn CounterStore>,
            dislikes.clone() as Arc<dyn CounterStore>,
        ));

        let post_service = PostManager::new(
            posts.clone() as Arc<dyn PostRepository>,
            engagement.clone() as Arc<dyn EngagementService>,
        );

        Self {
            posts,
            likes,
            dislikes,
            engagement,
            post_service,
        }
    }

    async fn seed_post(&self, author_id: Uuid) -> Post {
        self.posts
            .create(author_id, "hello".to_string())
            .await
            .unwrap()
    }
}

// =============================================================================
// Reaction Flow Tests
// =============================================================================

#[tokio::test]
async fn test_sequential_likes_accumulate() {
    let harness = Harness::new();
    let post = harness.seed_post(Uuid::new_v4()).await;

    for expected in 1..=3 {
        let outcome = harness
            .engagement
            .react(post.id, Reaction::Like, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(outcome.new_count, expected);
    }

    let stored = harness.posts.stored(post.id).unwrap();
    assert_eq!(stored.amount_of_likes, 3);
    assert_eq!(stored.amount_of_dislikes, 0);
    assert_eq!(harness.likes.stored(post.id), Some(3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_likes_never_lose_increments() {
    let harness = Harness::new();
    let post = harness.seed_post(Uuid::new_v4()).await;

    let reactions: i64 = 16;
    let mut handles = Vec::new();
    for _ in 0..reactions {
        let engagement = harness.engagement.clone();
        let post_id = post.id;
        handles.push(tokio::spawn(async move {
            engagement.react(post_id, Reaction::Like, Uuid::new_v4()).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Store-side atomic increments keep the count from ever dropping
    // below the number of accepted reactions; reseed contention on a
    // cold counter can add at most one.
    let count = harness.likes.stored(post.id).unwrap();
    assert!((reactions..=reactions + 1).contains(&count));

    // The durable mirror holds some successfully written value, never
    // more than the counter itself reached.
    let durable = harness.posts.stored(post.id).unwrap().amount_of_likes;
    assert!(durable >= 1 && durable <= count);
}

#[tokio::test]
async fn test_likes_and_dislikes_are_independent() {
    let harness = Harness::new();
    let post = harness.seed_post(Uuid::new_v4()).await;

    harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();
    harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();
    harness
        .engagement
        .react(post.id, Reaction::Dislike, Uuid::new_v4())
        .await
        .unwrap();

    let stored = harness.posts.stored(post.id).unwrap();
    assert_eq!(stored.amount_of_likes, 2);
    assert_eq!(stored.amount_of_dislikes, 1);
    assert_eq!(harness.likes.stored(post.id), Some(2));
    assert_eq!(harness.dislikes.stored(post.id), Some(1));
}

#[tokio::test]
async fn test_reseed_continues_from_durable_count_after_counter_loss() {
    let harness = Harness::new();
    let post = harness.seed_post(Uuid::new_v4()).await;

    // Build up 5 likes, then wipe the counter store to simulate eviction
    for _ in 0..5 {
        harness
            .engagement
            .react(post.id, Reaction::Like, Uuid::new_v4())
            .await
            .unwrap();
    }
    harness.likes.counts.lock().unwrap().clear();

    let outcome = harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();

    // The sixth like continues from the durable mirror, not from one
    assert_eq!(outcome.new_count, 6);
    assert_eq!(harness.posts.stored(post.id).unwrap().amount_of_likes, 6);
    assert_eq!(harness.likes.stored(post.id), Some(6));
}

#[tokio::test]
async fn test_author_cannot_react_but_others_can() {
    let harness = Harness::new();
    let author_id = Uuid::new_v4();
    let post = harness.seed_post(author_id).await;

    let result = harness
        .engagement
        .react(post.id, Reaction::Like, author_id)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let outcome = harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(outcome.new_count, 1);
}

#[tokio::test]
async fn test_react_on_missing_post_is_not_found() {
    let harness = Harness::new();

    let result = harness
        .engagement
        .react(Uuid::new_v4(), Reaction::Dislike, Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_counter_outage_leaves_durable_count_untouched() {
    let harness = Harness::new();
    let post = harness.seed_post(Uuid::new_v4()).await;

    harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();

    harness.likes.set_unavailable(true);

    let result = harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(AppError::Dependency(_))));

    // The failed reaction must not have advanced the durable mirror
    assert_eq!(harness.posts.stored(post.id).unwrap().amount_of_likes, 1);

    // The dislike store is unaffected by the like store outage
    let outcome = harness
        .engagement
        .react(post.id, Reaction::Dislike, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(outcome.new_count, 1);
}

// =============================================================================
// Deletion Cleanup Tests
// =============================================================================

#[tokio::test]
async fn test_delete_removes_post_and_counter_entries() {
    let harness = Harness::new();
    let author_id = Uuid::new_v4();
    let post = harness.seed_post(author_id).await;

    harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();
    harness
        .engagement
        .react(post.id, Reaction::Dislike, Uuid::new_v4())
        .await
        .unwrap();

    let deleted = harness
        .post_service
        .delete_post(post.id, author_id)
        .await
        .unwrap();

    assert_eq!(deleted, post.id);
    assert!(harness.posts.stored(post.id).is_none());
    assert_eq!(harness.likes.stored(post.id), None);
    assert_eq!(harness.dislikes.stored(post.id), None);
}

#[tokio::test]
async fn test_delete_succeeds_despite_counter_store_outage() {
    let harness = Harness::new();
    let author_id = Uuid::new_v4();
    let post = harness.seed_post(author_id).await;

    harness
        .engagement
        .react(post.id, Reaction::Like, Uuid::new_v4())
        .await
        .unwrap();

    // The dislike store being down must not block deletion, and the like
    // store's cleanup must still run.
    harness.dislikes.set_unavailable(true);

    let deleted = harness
        .post_service
        .delete_post(post.id, author_id)
        .await
        .unwrap();

    assert_eq!(deleted, post.id);
    assert!(harness.posts.stored(post.id).is_none());
    assert_eq!(harness.likes.stored(post.id), None);
}

#[tokio::test]
async fn test_delete_with_no_counter_entries_is_clean() {
    let harness = Harness::new();
    let author_id = Uuid::new_v4();
    let post = harness.seed_post(author_id).await;

    // No reactions ever recorded; counter deletes are no-ops
    let deleted = harness
        .post_service
        .delete_post(post.id, author_id)
        .await
        .unwrap();

    assert_eq!(deleted, post.id);
    assert!(harness.posts.stored(post.id).is_none());
}

// =============================================================================
// Ownership Tests
// =============================================================================

#[tokio::test]
async fn test_only_author_may_edit_or_delete() {
    let harness = Harness::new();
    let author_id = Uuid::new_v4();
    let stranger_id = Uuid::new_v4();
    let post = harness.seed_post(author_id).await;

    let edit = harness
        .post_service
        .edit_post(post.id, stranger_id, "hijacked".to_string())
        .await;
    assert!(matches!(edit, Err(AppError::Forbidden)));

    let delete = harness.post_service.delete_post(post.id, stranger_id).await;
    assert!(matches!(delete, Err(AppError::Forbidden)));

    let edited = harness
        .post_service
        .edit_post(post.id, author_id, "updated".to_string())
        .await
        .unwrap();
    assert_eq!(edited.text, "updated");
}

#[tokio::test]
async fn test_new_posts_start_with_zero_counts() {
    let harness = Harness::new();

    let post = harness
        .post_service
        .create_post(Uuid::new_v4(), "fresh".to_string())
        .await
        .unwrap();

    assert_eq!(post.amount_of_likes, 0);
    assert_eq!(post.amount_of_dislikes, 0);
    assert_eq!(harness.likes.stored(post.id), None);
    assert_eq!(harness.dislikes.stored(post.id), None);
}
