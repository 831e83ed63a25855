//! Document store access.
//!
//! Every handler talks to a `PostStore` trait object that is built once by
//! [`connect`] and handed down explicitly; nothing holds a global connection.

mod memory;
mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::{
    config::AppConfig,
    errors::StoreError,
    models::{NewPost, Post, PostPatch},
};

pub type SharedStore = Arc<dyn PostStore>;

/// URI prefix selecting the in-process store.
pub const MEMORY_URI: &str = "memory://";

/// CRUD operations over the `posts` collection.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Persists a post, assigning its id and creation timestamp.
    async fn insert(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Bulk insert. Returns the number of inserted posts.
    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<usize, StoreError>;

    /// Applies `patch` and returns the updated post, or `None` when no post
    /// has that id.
    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError>;

    /// Removes the post and returns it, or `None` when no post has that id.
    async fn delete(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Cheap round-trip used by the health check.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn shutdown(&self) {}
}

/// Builds the store selected by the configured URI.
pub async fn connect(config: &AppConfig) -> Result<SharedStore, StoreError> {
    if config.mongodb_uri.starts_with(MEMORY_URI) {
        info!("Using in-memory post store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = MongoStore::connect(&config.mongodb_uri, config.mongodb_database.as_deref()).await?;
    Ok(Arc::new(store))
}
