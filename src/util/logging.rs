// SarifLens - util/logging.rs
//
// Structured logging with runtime-selectable level.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - Host flag: `debug_flag = true`
//   - Config file: [logging] level = "debug"
//
// The engine is embedded in a host process that may already have installed
// a global subscriber, so initialisation never panics if one exists.

use tracing_subscriber::EnvFilter;

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > debug flag > config level > default "info".
///
/// Returns false if a global subscriber was already installed by the host.
pub fn init(debug_flag: bool, config_level: Option<&str>) -> bool {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_does_not_panic() {
        init(false, Some("warn"));
        assert!(!init(true, None), "a subscriber is already installed");
    }
}
