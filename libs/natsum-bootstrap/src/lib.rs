//! Process bootstrap for the `natsum` binary: layered configuration and
//! logging setup.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, ConfigError, ENV_PREFIX, LogFormat, LoggingConfig};
pub use logging::{build_filter, init_logging};
