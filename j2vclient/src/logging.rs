//! Subscriber setup for the client binary.

use j2vconfig::Config;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when `host.logger.min_level` is missing or unreadable.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Maps a configured level name to a filter, ignoring case.
pub fn string_to_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::TRACE),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "INFO" => Some(LevelFilter::INFO),
        "WARN" | "WARNING" => Some(LevelFilter::WARN),
        "ERROR" => Some(LevelFilter::ERROR),
        "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Level configured under `host.logger.min_level`.
pub fn configured_level(config: &Config) -> LevelFilter {
    config
        .get_log_min_level()
        .ok()
        .and_then(|name| string_to_level(&name))
        .unwrap_or(DEFAULT_LEVEL)
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Console output is
/// skipped when `host.logger.enable_console` is false.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(configured_level(config).into()));

    let enable_console = config.get_log_enable_console().unwrap_or(true);
    let console = enable_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(string_to_level("info"), Some(LevelFilter::INFO));
        assert_eq!(string_to_level(" Debug "), Some(LevelFilter::DEBUG));
        assert_eq!(string_to_level("WARNING"), Some(LevelFilter::WARN));
        assert_eq!(string_to_level("verbose"), None);
    }

    #[test]
    fn configured_level_falls_back_to_info() {
        let config = Config::from_yaml("host:\n  logger:\n    min_level: chatty\n").unwrap();
        assert_eq!(configured_level(&config), LevelFilter::INFO);

        let config = Config::from_yaml("host:\n  logger:\n    min_level: TRACE\n").unwrap();
        assert_eq!(configured_level(&config), LevelFilter::TRACE);
    }
}
