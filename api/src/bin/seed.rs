use anyhow::Context;
use blog_api::{config::AppConfig, seed, store, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = seed::seed_target(AppConfig::from_env().context("loading configuration")?);
    let store = store::connect(&config)
        .await
        .context("connecting to the document store")?;
    info!("Connected to the document store");

    let result = seed::seed(store.as_ref()).await;

    store.shutdown().await;
    info!("Disconnected from the document store");

    result.context("seeding database")?;
    Ok(())
}
