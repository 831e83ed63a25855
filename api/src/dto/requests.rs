use validator::Validate;

use crate::{
    errors::ApiError,
    models::{NewPost, PostFormat, PostPatch},
};

/// Arguments of `createPost`, trimmed and checked before they reach the store.
#[derive(Debug, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub format: Option<PostFormat>,
}

impl CreatePostRequest {
    pub fn new(title: String, content: String, author: String, format: Option<PostFormat>) -> Self {
        Self {
            title: title.trim().to_string(),
            content,
            author: author.trim().to_string(),
            format,
        }
    }

    pub fn into_new_post(self) -> Result<NewPost, ApiError> {
        self.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        // Content may legitimately start or end with whitespace (Markdown),
        // but a body that is nothing but whitespace is still empty.
        if self.content.trim().is_empty() {
            return Err(ApiError::Validation("content: Content must not be empty".into()));
        }

        Ok(NewPost {
            title: self.title,
            content: self.content,
            author: self.author,
            format: self.format.unwrap_or_default(),
        })
    }
}

/// Arguments of `updatePost`. Only fields that were supplied are validated.
#[derive(Debug, Default, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: Option<String>,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: Option<String>,
    pub format: Option<PostFormat>,
}

impl UpdatePostRequest {
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        author: Option<String>,
        format: Option<PostFormat>,
    ) -> Self {
        Self {
            title: title.map(|t| t.trim().to_string()),
            content,
            author: author.map(|a| a.trim().to_string()),
            format,
        }
    }

    pub fn into_patch(self) -> Result<PostPatch, ApiError> {
        self.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ApiError::Validation("content: Content must not be empty".into()));
        }

        Ok(PostPatch {
            title: self.title,
            content: self.content,
            author: self.author,
            format: self.format,
        })
    }
}
