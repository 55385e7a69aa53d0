//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
/// Calling this twice is harmless: the second install is ignored.
pub fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    // A subscriber installed by a test harness or an earlier call stays in place.
    drop(result);
}
