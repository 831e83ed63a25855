use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{OriginalUri, State},
    response::Html,
};

use crate::AppState;

/// POST /graphql
/// Body: { "query": "...", "variables": { ... } }
pub async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

/// GET /graphql
/// Interactive explorer pointed at the same path
pub async fn graphiql(OriginalUri(uri): OriginalUri) -> Html<String> {
    Html(GraphiQLSource::build().endpoint(uri.path()).finish())
}
