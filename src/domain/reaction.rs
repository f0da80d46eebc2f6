//! Reaction type - like or dislike events on a post.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{COUNTER_PREFIX_DISLIKES, COUNTER_PREFIX_LIKES};

/// The two reaction kinds a post can receive.
///
/// Each kind is backed by its own counter store and its own durable
/// count field; the two never share state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    /// Counter store key prefix for this reaction kind.
    ///
    /// Prefixes keep the key spaces disjoint even when both stores are
    /// configured against the same Redis instance.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Reaction::Like => COUNTER_PREFIX_LIKES,
            Reaction::Dislike => COUNTER_PREFIX_DISLIKES,
        }
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reaction::Like => write!(f, "like"),
            Reaction::Dislike => write!(f, "dislike"),
        }
    }
}
