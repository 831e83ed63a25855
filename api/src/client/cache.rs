use std::collections::HashMap;

use crate::models::Post;

/// Local copy of query results.
///
/// Writes happen only with data the server has already returned, so the
/// cache never gets ahead of the store.
#[derive(Debug, Default, Clone)]
pub struct PostCache {
    list: Option<Vec<Post>>,
    by_id: HashMap<String, Post>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result of the `posts` query, if it has been loaded.
    pub fn list(&self) -> Option<&[Post]> {
        self.list.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.by_id.get(id)
    }

    pub fn store_list(&mut self, posts: Vec<Post>) {
        for post in &posts {
            self.by_id.insert(post.id.clone(), post.clone());
        }
        self.list = Some(posts);
    }

    /// Records a freshly created post at the head of the list.
    pub fn store_created(&mut self, post: Post) {
        if let Some(list) = self.list.as_mut() {
            list.retain(|p| p.id != post.id);
            list.insert(0, post.clone());
        }
        self.by_id.insert(post.id.clone(), post);
    }

    /// Replaces a post in place, keeping its list position.
    pub fn store_post(&mut self, post: Post) {
        if let Some(list) = self.list.as_mut() {
            if let Some(slot) = list.iter_mut().find(|p| p.id == post.id) {
                *slot = post.clone();
            }
        }
        self.by_id.insert(post.id.clone(), post);
    }

    /// Drops a post after the server confirmed its deletion.
    pub fn evict(&mut self, id: &str) -> Option<Post> {
        if let Some(list) = self.list.as_mut() {
            list.retain(|p| p.id != id);
        }
        self.by_id.remove(id)
    }

    /// Forces the next list read to go to the server.
    pub fn invalidate_list(&mut self) {
        self.list = None;
    }

    pub fn clear(&mut self) {
        self.list = None;
        self.by_id.clear();
    }
}
