use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::models::{Post, PostFormat};

const POST_FIELDS: &str = "id title content author format createdAt";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    GraphQl {
        message: String,
        code: Option<String>,
    },

    #[error("response carried no `{0}` field")]
    MissingData(&'static str),

    #[error("{0}")]
    InvalidState(&'static str),
}

impl ClientError {
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::GraphQl { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some("NOT_FOUND")
    }
}

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorBody>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorBody {
    message: String,
    #[serde(default)]
    extensions: Option<Value>,
}

/// Field values edited by the form and sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub author: String,
    pub format: PostFormat,
}

/// Executes the blog's queries and mutations against one GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct BlogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl BlogClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), endpoint)
    }

    pub fn with_http(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one operation and deserializes `data.<field>`.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &'static str,
    ) -> Result<T, ClientError> {
        debug!("GraphQL {} -> {}", field, self.endpoint);

        let response: GraphQlResponse = self
            .http
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(first) = response.errors.into_iter().next() {
            let code = first
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(ClientError::GraphQl {
                message: first.message,
                code,
            });
        }

        let value = response
            .data
            .and_then(|mut data| data.get_mut(field).map(Value::take))
            .ok_or(ClientError::MissingData(field))?;

        serde_json::from_value(value).map_err(|e| ClientError::GraphQl {
            message: format!("malformed `{}` payload: {}", field, e),
            code: None,
        })
    }

    pub async fn posts(&self) -> Result<Vec<Post>, ClientError> {
        let query = format!("query GetPosts {{ posts {{ {POST_FIELDS} }} }}");
        self.execute(&query, json!({}), "posts").await
    }

    pub async fn post(&self, id: &str) -> Result<Option<Post>, ClientError> {
        let query = format!("query GetPost($id: ID!) {{ post(id: $id) {{ {POST_FIELDS} }} }}");
        self.execute(&query, json!({ "id": id }), "post").await
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Post, ClientError> {
        let query = format!(
            "mutation CreatePost($title: String!, $content: String!, $author: String!, $format: PostFormat) \
             {{ createPost(title: $title, content: $content, author: $author, format: $format) {{ {POST_FIELDS} }} }}"
        );
        let variables = json!({
            "title": draft.title,
            "content": draft.content,
            "author": draft.author,
            "format": draft.format,
        });
        self.execute(&query, variables, "createPost").await
    }

    pub async fn update_post(&self, id: &str, draft: &PostDraft) -> Result<Option<Post>, ClientError> {
        let query = format!(
            "mutation UpdatePost($id: ID!, $title: String, $content: String, $author: String, $format: PostFormat) \
             {{ updatePost(id: $id, title: $title, content: $content, author: $author, format: $format) {{ {POST_FIELDS} }} }}"
        );
        let variables = json!({
            "id": id,
            "title": draft.title,
            "content": draft.content,
            "author": draft.author,
            "format": draft.format,
        });
        self.execute(&query, variables, "updatePost").await
    }

    pub async fn delete_post(&self, id: &str) -> Result<bool, ClientError> {
        let query = "mutation DeletePost($id: ID!) { deletePost(id: $id) }";
        self.execute(query, json!({ "id": id }), "deletePost").await
    }
}
