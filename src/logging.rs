use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for `log_level`, falling back to `info` when it does not parse
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global stdout subscriber. A second call is a no-op.
pub fn init_tracing(log_level: &str) {
    let stdout_layer = fmt::layer().with_target(true);

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("tracing subscriber already installed: {err}");
    }
}
