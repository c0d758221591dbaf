use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable overriding the log filter (`EnvFilter` syntax).
pub const LOG_ENV: &str = "BACKED_FEED_LOG";

/// Initialize tracing to stderr.
///
/// `BACKED_FEED_LOG` takes precedence over `default_filter`. Calling this
/// more than once is harmless: later calls leave the first subscriber in
/// place.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
