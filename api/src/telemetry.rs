use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "blog_api=info,seed=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging. `RUST_LOG` overrides the default filter.
///
/// Call once, at the top of a binary's `main`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .init();
}
