use async_graphql::ErrorExtensions;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Failures reported by a `PostStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("post {0} not found")]
    NotFound(String),

    #[error("invalid post id: {0}")]
    InvalidId(String),

    #[error("document store unreachable: {0}")]
    Connection(String),

    #[error("document store operation failed: {0}")]
    Backend(String),
}

/// What a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Persistence,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("error {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        ApiError::Store { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Store { source, .. } => match source {
                StoreError::NotFound(_) => ErrorKind::NotFound,
                StoreError::InvalidId(_) => ErrorKind::Validation,
                StoreError::Connection(_) | StoreError::Backend(_) => ErrorKind::Persistence,
            },
            ApiError::Unavailable(_) => ErrorKind::Persistence,
        }
    }

    /// Value of `extensions.code` in GraphQL error responses.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "BAD_USER_INPUT",
            ApiError::Store { source, .. } => match source {
                StoreError::NotFound(_) => "NOT_FOUND",
                StoreError::InvalidId(_) => "BAD_USER_INPUT",
                StoreError::Connection(_) => "STORE_UNAVAILABLE",
                StoreError::Backend(_) => "INTERNAL_SERVER_ERROR",
            },
            ApiError::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    fn operation(&self) -> Option<&'static str> {
        match self {
            ApiError::Store { operation, .. } => Some(operation),
            _ => None,
        }
    }

    /// Logs the failure at a level matching its kind.
    pub fn log(&self) {
        match self.kind() {
            ErrorKind::Persistence => error!("{}", self),
            ErrorKind::NotFound | ErrorKind::Validation => warn!("{}", self),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Some(operation) = self.operation() {
                e.set("operation", operation);
            }
        })
    }
}

/// Convert our errors to plain HTTP responses (non-GraphQL routes).
///
/// Persistence detail is logged, never returned to the caller.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Persistence => StatusCode::SERVICE_UNAVAILABLE,
        };

        let message = match self.kind() {
            ErrorKind::Persistence => {
                error!("Internal error: {}", self);
                "Service unavailable".to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(serde_json::json!({
              "error": message,
              "code": self.code(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinguishable() {
        let not_found = ApiError::store("deleting post", StoreError::NotFound("x".into()));
        let down = ApiError::store("deleting post", StoreError::Connection("refused".into()));

        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(not_found.code(), "NOT_FOUND");
        assert_eq!(down.kind(), ErrorKind::Persistence);
        assert_eq!(down.code(), "STORE_UNAVAILABLE");
    }

    #[test]
    fn message_keeps_the_cause() {
        let err = ApiError::store("fetching posts", StoreError::Backend("cursor died".into()));
        assert_eq!(
            err.to_string(),
            "error fetching posts: document store operation failed: cursor died"
        );
    }

    #[test]
    fn graphql_error_carries_code_and_operation() {
        let err = ApiError::store("updating post", StoreError::InvalidId("nope".into())).extend();
        let ext = err.extensions.expect("extensions set");
        assert_eq!(
            ext.get("code"),
            Some(&async_graphql::Value::from("BAD_USER_INPUT"))
        );
        assert_eq!(
            ext.get("operation"),
            Some(&async_graphql::Value::from("updating post"))
        );
    }

    #[test]
    fn persistence_errors_map_to_503() {
        let resp = ApiError::Unavailable("ping failed".into()).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
