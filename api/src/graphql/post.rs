use async_graphql::{Context, ErrorExtensions, ID, Object, Result as GraphQLResult};
use tracing::{debug, info};

use super::Date;
use crate::{
    dto::{CreatePostRequest, UpdatePostRequest},
    errors::{ApiError, StoreError},
    models::{Post, PostFormat},
    store::SharedStore,
};

#[Object]
impl Post {
    async fn id(&self) -> ID {
        ID(self.id.clone())
    }

    async fn title(&self) -> &str {
        &self.title
    }

    async fn content(&self) -> &str {
        &self.content
    }

    async fn author(&self) -> &str {
        &self.author
    }

    async fn format(&self) -> PostFormat {
        self.format
    }

    async fn created_at(&self) -> Date {
        Date(self.created_at)
    }
}

fn store<'a>(ctx: &Context<'a>) -> GraphQLResult<&'a SharedStore> {
    ctx.data::<SharedStore>()
}

/// Logs `err` and turns it into a GraphQL error carrying its code.
fn reject(err: ApiError) -> async_graphql::Error {
    err.log();
    err.extend()
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// All posts, newest first.
    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let posts = store(ctx)?
            .list()
            .await
            .map_err(|e| reject(ApiError::store("fetching posts", e)))?;

        debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    /// A single post, or null when no post has this id.
    async fn post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<Post>> {
        match store(ctx)?.find_by_id(&id).await {
            Ok(post) => Ok(post),
            // A malformed id cannot match anything
            Err(StoreError::InvalidId(_)) => Ok(None),
            Err(e) => Err(reject(ApiError::store("fetching post", e))),
        }
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        title: String,
        content: String,
        author: String,
        format: Option<PostFormat>,
    ) -> GraphQLResult<Post> {
        let new_post = CreatePostRequest::new(title, content, author, format)
            .into_new_post()
            .map_err(reject)?;

        let post = store(ctx)?
            .insert(new_post)
            .await
            .map_err(|e| reject(ApiError::store("creating post", e)))?;

        info!("Post created: {} by {}", post.id, post.author);
        Ok(post)
    }

    /// Partial update. Returns null when no post has this id.
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
        format: Option<PostFormat>,
    ) -> GraphQLResult<Option<Post>> {
        let patch = UpdatePostRequest::new(title, content, author, format)
            .into_patch()
            .map_err(reject)?;

        let updated = store(ctx)?
            .update(&id, patch)
            .await
            .map_err(|e| reject(ApiError::store("updating post", e)))?;

        match &updated {
            Some(post) => info!("Post updated: {}", post.id),
            None => debug!("Update skipped, post {} does not exist", id.as_str()),
        }
        Ok(updated)
    }

    /// Hard delete. Deleting an id that matches nothing is a `NOT_FOUND` error.
    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<bool> {
        let deleted = store(ctx)?
            .delete(&id)
            .await
            .map_err(|e| reject(ApiError::store("deleting post", e)))?;

        match deleted {
            Some(post) => {
                info!("Post deleted: {}", post.id);
                Ok(true)
            }
            None => Err(reject(ApiError::store(
                "deleting post",
                StoreError::NotFound(id.to_string()),
            ))),
        }
    }
}
