use async_graphql::Enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the client should interpret `Post::content`.
#[derive(Enum, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostFormat {
    #[default]
    Plain,
    Markdown,
}

impl PostFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostFormat::Plain => "PLAIN",
            PostFormat::Markdown => "MARKDOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub format: PostFormat,
    pub created_at: DateTime<Utc>,
}

/// A post that has not been persisted yet. The store assigns `id` and
/// `created_at` on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub format: PostFormat,
}

impl NewPost {
    pub fn into_post(self, id: String, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            author: self.author,
            format: self.format,
            created_at,
        }
    }
}

/// Partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub format: Option<PostFormat>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.format.is_none()
    }

    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(format) = self.format {
            post.format = format;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        NewPost {
            title: "T".into(),
            content: "C".into(),
            author: "A".into(),
            format: PostFormat::Plain,
        }
        .into_post("1".into(), Utc::now())
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut post = sample();
        let created_at = post.created_at;

        PostPatch {
            title: Some("T2".into()),
            author: Some("A2".into()),
            ..Default::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "T2");
        assert_eq!(post.author, "A2");
        assert_eq!(post.content, "C");
        assert_eq!(post.format, PostFormat::Plain);
        assert_eq!(post.created_at, created_at);
    }

    #[test]
    fn format_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&PostFormat::Markdown).unwrap(),
            "\"MARKDOWN\""
        );
        assert_eq!(PostFormat::default(), PostFormat::Plain);
    }

    #[test]
    fn post_uses_camel_case_on_the_wire() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["format"], "PLAIN");
    }
}
