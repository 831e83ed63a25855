use crate::{graphql::BlogSchema, store::SharedStore};

/// Shared across all requests. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub schema: BlogSchema,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        let schema = crate::graphql::build_schema(store.clone());
        Self { store, schema }
    }
}
