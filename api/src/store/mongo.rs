use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
    error::ErrorKind,
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::PostStore;
use crate::{
    errors::StoreError,
    models::{NewPost, Post, PostFormat, PostPatch},
};

const COLLECTION: &str = "posts";
const DEFAULT_DATABASE: &str = "blog";

/// Shape of a post inside the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    title: String,
    content: String,
    author: String,
    #[serde(default)]
    format: PostFormat,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
}

impl PostDocument {
    fn from_new(post: NewPost, created_at: bson::DateTime) -> Self {
        Self {
            id: None,
            title: post.title,
            content: post.content,
            author: post.author,
            format: post.format,
            created_at,
        }
    }
}

impl TryFrom<PostDocument> for Post {
    type Error = StoreError;

    fn try_from(doc: PostDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::Backend("document without _id".into()))?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
            .ok_or_else(|| StoreError::Backend(format!("createdAt out of range on {}", id)))?;

        Ok(Post {
            id: id.to_hex(),
            title: doc.title,
            content: doc.content,
            author: doc.author,
            format: doc.format,
            created_at,
        })
    }
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

/// `$set` body for a partial update.
fn set_document(patch: PostPatch) -> Document {
    let mut set = Document::new();
    if let Some(title) = patch.title {
        set.insert("title", title);
    }
    if let Some(content) = patch.content {
        set.insert("content", content);
    }
    if let Some(author) = patch.author {
        set.insert("author", author);
    }
    if let Some(format) = patch.format {
        set.insert("format", format.as_str());
    }
    set
}

/// Newest first; `_id` breaks ties since ObjectIds grow with insertion.
fn list_sort() -> Document {
    doc! { "createdAt": -1, "_id": -1 }
}

fn map_driver_error(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Connection(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Posts stored in a MongoDB collection.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
    posts: Collection<PostDocument>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await.map_err(map_driver_error)?;

        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };
        let posts = db.collection::<PostDocument>(COLLECTION);

        let store = Self { client, db, posts };
        store.ping().await?;

        info!("MongoDB connected: database {}", store.db.name());
        Ok(store)
    }
}

#[async_trait]
impl PostStore for MongoStore {
    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let cursor = self
            .posts
            .find(doc! {})
            .sort(list_sort())
            .await
            .map_err(map_driver_error)?;

        let docs: Vec<PostDocument> = cursor.try_collect().await.map_err(map_driver_error)?;
        docs.into_iter().map(Post::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let oid = parse_id(id)?;
        self.posts
            .find_one(doc! { "_id": oid })
            .await
            .map_err(map_driver_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn insert(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut doc = PostDocument::from_new(post, bson::DateTime::now());

        let result = self.posts.insert_one(&doc).await.map_err(map_driver_error)?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("inserted id is not an ObjectId".into()))?;
        doc.id = Some(id);

        Post::try_from(doc)
    }

    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<usize, StoreError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let now = bson::DateTime::now();
        let docs: Vec<PostDocument> = posts
            .into_iter()
            .map(|post| PostDocument::from_new(post, now))
            .collect();

        let result = self.posts.insert_many(docs).await.map_err(map_driver_error)?;
        Ok(result.inserted_ids.len())
    }

    async fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let oid = parse_id(id)?;
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        self.posts
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set_document(patch) })
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_driver_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn delete(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let oid = parse_id(id)?;
        self.posts
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(map_driver_error)?
            .map(Post::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(map_driver_error)
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB connection closed");
    }
}
