//! Structured logging for the binding toolkit
//!
//! Installs a `tracing` subscriber filtered by `RUST_LOG` or the configured
//! level. Bindings emit `debug` events when a store is resolved and `trace`
//! events on every refetch, so `jetpack_core=trace` shows the cache protocol.

use jetpack_core::config::LoggingConfig;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Set once the global subscriber is installed
static INSTALLED: OnceCell<TelemetryConfig> = OnceCell::new();

/// Initialize logging with defaults
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// Calling this again after a successful initialization is a no-op.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| anyhow::anyhow!("Invalid log level {:?}: {}", config.log_level, e))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(config.show_target)
                    .with_thread_ids(config.show_thread_ids)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number)
                    .compact(),
            )
            .try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.log_level,
        "Telemetry initialized"
    );

    let _ = INSTALLED.set(config);
    Ok(())
}

/// Configuration the global subscriber was installed with, if any
pub fn installed_config() -> Option<&'static TelemetryConfig> {
    INSTALLED.get()
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub show_target: bool,
    pub show_thread_ids: bool,
    pub show_file: bool,
    pub show_line_number: bool,
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json: false,
        }
    }
}

impl From<&LoggingConfig> for TelemetryConfig {
    fn from(logging: &LoggingConfig) -> Self {
        Self {
            log_level: logging.level.clone(),
            show_target: logging.show_target,
            json: logging.json,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetpack_core::config::Config;

    #[test]
    fn test_config_from_logging_section() {
        let config = Config::from_toml_str("[logging]\nlevel = \"jetpack_core=trace\"\njson = true").unwrap();
        let telemetry = TelemetryConfig::from(&config.schema.logging);

        assert_eq!(telemetry.log_level, "jetpack_core=trace");
        assert!(telemetry.json);
        assert!(!telemetry.show_file);
    }

    #[test]
    fn test_init_is_idempotent() {
        init().unwrap();
        init_with_config(TelemetryConfig {
            log_level: "debug".to_string(),
            ..TelemetryConfig::default()
        })
        .unwrap();

        assert_eq!(installed_config().map(|c| c.log_level.as_str()), Some("info"));
    }
}
