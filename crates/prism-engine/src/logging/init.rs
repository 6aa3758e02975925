use std::sync::Once;

/// Filter applied when neither the config nor `RUST_LOG` provides one.
///
/// wgpu's internals are chatty at `info`; keep them at `warn` so per-surface
/// configuration messages from this crate stay readable.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` uses `env_logger` directive syntax
/// (e.g. `"debug"`, `"prism_engine=trace,wgpu=warn"`).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Config with an explicit filter, overriding `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger.
///
/// Only the first call has an effect. Filter precedence: explicit
/// `env_filter`, then `RUST_LOG`, then [`DEFAULT_FILTER`].
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);
        builder.format_timestamp_millis();

        // Another crate may already own the global logger (e.g. test harnesses).
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized with filter `{filter}`");
    });
}
