use tracing::warn;

use super::{BlogClient, ClientError, PostCache};
use crate::models::{Post, PostFormat};

const EXCERPT_CHARS: usize = 180;

/// One row of the post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub author_initial: char,
    /// e.g. `Jan 5, 2024`
    pub date: String,
    pub markdown: bool,
    pub excerpt: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        let author_initial = post
            .author
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('A');

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            author_initial,
            date: post.created_at.format("%b %-d, %Y").to_string(),
            markdown: post.format == PostFormat::Markdown,
            excerpt: excerpt(&post.content),
        }
    }
}

fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Loads the list through the cache, querying the server only on a miss.
pub async fn load_posts(client: &BlogClient, cache: &mut PostCache) -> Result<Vec<PostSummary>, ClientError> {
    if cache.list().is_none() {
        let posts = client.posts().await?;
        cache.store_list(posts);
    }

    Ok(cache
        .list()
        .unwrap_or_default()
        .iter()
        .map(PostSummary::from)
        .collect())
}

/// Detail view data, served from the cache when present.
pub async fn load_post(
    client: &BlogClient,
    cache: &mut PostCache,
    id: &str,
) -> Result<Option<Post>, ClientError> {
    if let Some(post) = cache.get(id) {
        return Ok(Some(post.clone()));
    }

    let post = client.post(id).await?;
    if let Some(post) = &post {
        cache.store_post(post.clone());
    }
    Ok(post)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteState {
    Idle,
    Confirming { id: String, title: String },
    Deleting { id: String, title: String },
    Failed { id: String, title: String, message: String },
}

/// Two-step delete: [`request`](DeleteFlow::request) opens the modal,
/// [`confirm`](DeleteFlow::confirm) sends the mutation.
#[derive(Debug, Clone)]
pub struct DeleteFlow {
    state: DeleteState,
}

impl Default for DeleteFlow {
    fn default() -> Self {
        Self {
            state: DeleteState::Idle,
        }
    }
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn request(&mut self, post: &PostSummary) {
        self.state = DeleteState::Confirming {
            id: post.id.clone(),
            title: post.title.clone(),
        };
    }

    /// Body of the confirmation modal while it is open.
    pub fn modal_message(&self) -> Option<String> {
        match &self.state {
            DeleteState::Confirming { title, .. } | DeleteState::Failed { title, .. } => Some(format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                title
            )),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        if !matches!(self.state, DeleteState::Deleting { .. }) {
            self.state = DeleteState::Idle;
        }
    }

    /// Sends the delete mutation. The post leaves `cache` only after the
    /// server confirmed the deletion; on failure the cache is untouched.
    pub async fn confirm(
        &mut self,
        client: &BlogClient,
        cache: &mut PostCache,
    ) -> Result<(), ClientError> {
        let (id, title) = match std::mem::replace(&mut self.state, DeleteState::Idle) {
            DeleteState::Confirming { id, title } | DeleteState::Failed { id, title, .. } => {
                (id, title)
            }
            other => {
                self.state = other;
                return Err(ClientError::InvalidState("no delete awaiting confirmation"));
            }
        };
        self.state = DeleteState::Deleting {
            id: id.clone(),
            title: title.clone(),
        };

        let result = match client.delete_post(&id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ClientError::InvalidState("server did not delete the post")),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                cache.evict(&id);
                self.state = DeleteState::Idle;
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                // Already gone on the server, drop our stale copy
                cache.evict(&id);
                self.state = DeleteState::Idle;
                Err(e)
            }
            Err(e) => {
                warn!("Failed to delete post {}: {}", id, e);
                self.state = DeleteState::Failed {
                    id,
                    title,
                    message: "Failed to delete post".to_string(),
                };
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(content: &str, format: PostFormat) -> Post {
        Post {
            id: "1".into(),
            title: "Hello".into(),
            content: content.into(),
            author: "jane".into(),
            format,
            created_at: Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn summary_fields() {
        let summary = PostSummary::from(&post("Short body", PostFormat::Markdown));

        assert_eq!(summary.author_initial, 'J');
        assert_eq!(summary.date, "Jan 5, 2024");
        assert!(summary.markdown);
        assert_eq!(summary.excerpt, "Short body");
    }

    #[test]
    fn long_content_is_truncated_on_char_boundaries() {
        let long = "é".repeat(200);
        let summary = PostSummary::from(&post(&long, PostFormat::Plain));

        assert!(!summary.markdown);
        assert!(summary.excerpt.ends_with("..."));
        assert_eq!(summary.excerpt.chars().count(), EXCERPT_CHARS + 3);

        let exact = "x".repeat(EXCERPT_CHARS);
        assert_eq!(excerpt(&exact), exact);
    }

    #[test]
    fn anonymous_author_gets_default_initial() {
        let mut p = post("C", PostFormat::Plain);
        p.author = String::new();
        assert_eq!(PostSummary::from(&p).author_initial, 'A');
    }

    #[test]
    fn delete_needs_two_steps() {
        let summary = PostSummary::from(&post("C", PostFormat::Plain));
        let mut flow = DeleteFlow::new();
        assert_eq!(flow.modal_message(), None);

        flow.request(&summary);
        assert_eq!(
            flow.modal_message().unwrap(),
            "Are you sure you want to delete \"Hello\"? This action cannot be undone."
        );

        flow.cancel();
        assert_eq!(flow.state(), &DeleteState::Idle);
    }

    #[tokio::test]
    async fn confirm_without_request_is_rejected() {
        let client = BlogClient::new("http://127.0.0.1:9/graphql");
        let mut cache = PostCache::new();
        let mut flow = DeleteFlow::new();

        let err = flow.confirm(&client, &mut cache).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidState(_)));
    }

    #[tokio::test]
    async fn failed_delete_leaves_cache_alone() {
        // Nothing listens on the discard port
        let client = BlogClient::new("http://127.0.0.1:9/graphql");
        let p = post("C", PostFormat::Plain);
        let mut cache = PostCache::new();
        cache.store_list(vec![p.clone()]);

        let mut flow = DeleteFlow::new();
        flow.request(&PostSummary::from(&p));
        assert!(flow.confirm(&client, &mut cache).await.is_err());

        assert!(matches!(flow.state(), DeleteState::Failed { .. }));
        assert!(flow.modal_message().is_some());
        assert_eq!(cache.list().unwrap().len(), 1);
        assert!(cache.get("1").is_some());
    }
}
