//! Telemetry and observability setup
//!
//! Configures structured logging with tracing and tracing-subscriber.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Filter directive used when `RUST_LOG` is not set
fn default_directive(level: &str) -> String {
    format!("awsquiz={},tower_http={}", level, level)
}

/// Initialize tracing subscriber for structured logging
///
/// Only the first call per process has an effect. `RUST_LOG` takes
/// precedence over `default_level`.
///
/// # Examples
///
/// ```no_run
/// awsquiz::telemetry::init("info");
/// tracing::info!("Application started");
/// ```
pub fn init(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

        // Logs go to stderr so `awsquiz generate` keeps stdout for JSON
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_scopes_crate_and_http() {
        assert_eq!(default_directive("debug"), "awsquiz=debug,tower_http=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init("warn");
        init("debug");
    }
}
