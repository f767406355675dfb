use tracing_subscriber::EnvFilter;

use dayplay_core::storage::LogConfig;

/// Install the stderr subscriber.
///
/// `DAYPLAY_LOG` wins over the configured level; an unparsable directive
/// falls back to `warn`.
pub fn init(config: &LogConfig) {
    let env_filter = std::env::var("DAYPLAY_LOG")
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(&config.level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
