// ============================================================================
// BLOG API - GraphQL over a document store
// ============================================================================

// - Post CRUD through a single GraphQL endpoint
// - MongoDB or in-memory document store behind one trait
// - Typed errors with machine-readable codes
// - CORS configuration
// - Input validation
// - Structured logging
// - Client library: transport, cache, form and delete flows

pub mod client;
pub mod config;
pub mod dto;
pub mod errors;
pub mod graphql;
pub mod models;
pub mod routes;
pub mod seed;
pub mod states;
pub mod store;
pub mod telemetry;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use states::AppState;

/// Builds the router: the GraphQL endpoint on `graphql_path` plus `/health`.
pub fn build_router(state: AppState, graphql_path: &str) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route(
            graphql_path,
            get(routes::graphiql).post(routes::graphql_handler),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
