//! Structured logging infrastructure for Kinship.
//!
//! This module provides centralized logging initialization with support
//! for structured JSON output and environment-based configuration.

use crate::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system with human-readable output.
///
/// Log level can be configured via the `RUST_LOG` environment variable.
/// If not set, defaults to `info` level.
///
/// # Example
/// ```no_run
/// use kinship_core::logging;
///
/// logging::init();
/// tracing::info!("Universe loaded");
/// ```
pub fn init() {
    init_with(&LoggingConfig::default());
}

/// Initialize the logging system with JSON output.
///
/// # Example
/// ```no_run
/// use kinship_core::logging;
///
/// logging::init_json();
/// tracing::info!(messages = 42, "Universe loaded");
/// ```
pub fn init_json() {
    init_with(&LoggingConfig {
        json: true,
        ..LoggingConfig::default()
    });
}

/// Initialize from a [`LoggingConfig`]. `RUST_LOG` overrides `config.level`.
///
/// Calling this more than once is a no-op.
pub fn init_with(config: &LoggingConfig) {
    let filter = env_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    // try_init: a subscriber may already be installed (tests, embedding apps)
    let _ = if config.json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .try_init()
    };
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
