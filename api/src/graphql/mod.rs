//! GraphQL schema: `Post` type, `Date` scalar and the post queries/mutations.

mod post;
mod scalars;

use async_graphql::{EmptySubscription, MergedObject, Schema};

pub use post::{PostMutation, PostQuery};
pub use scalars::Date;

use crate::store::SharedStore;

#[derive(MergedObject, Default)]
pub struct QueryRoot(PostQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(PostMutation);

pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema around an explicitly passed store handle.
pub fn build_schema(store: SharedStore) -> BlogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(store)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn schema_exposes_post_operations() {
        let schema = build_schema(Arc::new(MemoryStore::new()));
        let sdl = schema.sdl();

        assert!(sdl.contains("scalar Date"));
        assert!(sdl.contains("enum PostFormat"));
        assert!(sdl.contains("posts: [Post!]!"));
        assert!(sdl.contains("deletePost(id: ID!): Boolean!"));
        assert!(sdl.contains("createdAt: Date!"));
    }
}
