use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use super::PostStore;
use crate::{
    errors::StoreError,
    models::{NewPost, Post, PostPatch},
};

#[derive(Debug, Clone)]
struct StoredPost {
    // Insertion order, breaks ties between equal timestamps.
    seq: u64,
    post: Post,
}

/// `DashMap`-backed store for development and tests.
///
/// Cloning shares the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    posts: Arc<DashMap<String, StoredPost>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn stamp(&self, post: NewPost) -> StoredPost {
        // Millisecond precision, same as a BSON date.
        let created_at = Utc::now().trunc_subsecs(3);
        StoredPost {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            post: post.into_post(Uuid::new_v4().to_string(), created_at),
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let mut stored: Vec<StoredPost> = self
            .posts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        // Newest first
        stored.sort_by(|a, b| {
            b.post
                .created_at
                .cmp(&a.post.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(stored.into_iter().map(|s| s.post).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.get(id).map(|entry| entry.post.clone()))
    }

    async fn insert(&self, post: NewPost) -> Result<Post, StoreError> {
        let stored = self.stamp(post);
        let post = stored.post.clone();
        self.posts.insert(post.id.clone(), stored);
        Ok(post)
    }

    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<usize, StoreError> {
        let count = posts.len();
        for post in posts {
            let stored = self.stamp(post);
            self.posts.insert(stored.post.id.clone(), stored);
        }
        Ok(count)
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let Some(mut entry) = self.posts.get_mut(id) else {
            return Ok(None);
        };
        patch.apply_to(&mut entry.post);
        Ok(Some(entry.post.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.remove(id).map(|(_, stored)| stored.post))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
