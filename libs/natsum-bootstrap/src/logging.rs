use std::io;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::{LogFormat, LoggingConfig};

/// Builds the filter: `RUST_LOG` when it is set, else `cfg.level`.
///
/// # Errors
/// Returns an error if the chosen directive string does not parse.
pub fn build_filter(cfg: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid RUST_LOG directives '{directives}'")),
        _ => EnvFilter::try_new(cfg.level.trim())
            .with_context(|| format!("invalid logging.level '{}'", cfg.level)),
    }
}

/// Installs the global subscriber. All output goes to stderr so stdout
/// carries only results.
///
/// # Errors
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(cfg)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match cfg.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(cfg.ansi)
                    .with_target(false)
                    .without_time(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };
    installed.context("failed to install the global tracing subscriber")?;

    tracing::debug!(level = %cfg.level, format = ?cfg.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_level(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_owned(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn configured_level_is_used_without_rust_log() {
        let filter = temp_env::with_var_unset("RUST_LOG", || {
            build_filter(&config_with_level("warn")).unwrap()
        });
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn rust_log_takes_precedence() {
        let filter = temp_env::with_var("RUST_LOG", Some("natsum_core=trace"), || {
            build_filter(&config_with_level("warn")).unwrap()
        });
        assert_eq!(filter.to_string(), "natsum_core=trace");
    }

    #[test]
    fn blank_rust_log_falls_back_to_config() {
        let filter = temp_env::with_var("RUST_LOG", Some("  "), || {
            build_filter(&config_with_level("error")).unwrap()
        });
        assert_eq!(filter.to_string(), "error");
    }

    #[test]
    fn invalid_directive_is_an_error() {
        let result = temp_env::with_var_unset("RUST_LOG", || {
            build_filter(&config_with_level("natsum_core=loud"))
        });
        assert!(result.is_err());
    }
}
