use anyhow::Context;
use blog_api::{AppState, build_router, config::AppConfig, store, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;
    info!("Starting in {:?} mode", config.environment);

    let store = store::connect(&config)
        .await
        .context("connecting to the document store")?;

    let app = build_router(AppState::new(store.clone()), &config.graphql_path);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("GraphQL endpoint: http://{}{}", addr, config.graphql_path);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.shutdown().await;

    if let Err(e) = &served {
        error!("Server error: {}", e);
    }
    served.context("serving HTTP")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(?e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
