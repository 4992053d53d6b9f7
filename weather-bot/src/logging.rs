use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}
