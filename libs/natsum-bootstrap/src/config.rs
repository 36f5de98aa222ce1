//! Layered application configuration.
//!
//! Sources are merged in this order, later ones winning:
//! 1. built-in defaults
//! 2. YAML file passed with `--config`
//! 3. environment variables prefixed with `NATSUM__` (`__` separates
//!    nesting levels, e.g. `NATSUM__LOGGING__LEVEL=debug`)
//! 4. command-line overrides such as `-v`

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "NATSUM__";

/// Errors raised while loading or rendering configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to load configuration: {0}")]
    Extract(#[from] Box<figment::Error>),

    #[error("invalid logging.level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("failed to render configuration as YAML: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `natsum_core=debug`.
    pub level: String,
    pub format: LogFormat,
    /// Colorize text output.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            ansi: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Command-line values that feed into the configuration merge.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub verbose: u8,
}

impl AppConfig {
    /// Loads defaults, then the optional YAML file, then `NATSUM__*` env vars.
    ///
    /// # Errors
    /// Returns an error if `path` is given but is not a file, if any source
    /// fails to parse, or if the merged values are invalid.
    pub fn load_layered(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `-v` style verbosity on top of the loaded level.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        match args.verbose {
            0 => {}
            1 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// Checks that `logging.level` is a plain level or a valid filter
    /// directive list.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidLevel`] when the directive cannot be parsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim();
        if level.parse::<LevelFilter>().is_ok() {
            return Ok(());
        }
        tracing_subscriber::EnvFilter::try_new(level)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidLevel {
                level: self.logging.level.clone(),
                reason: e.to_string(),
            })
    }

    /// # Errors
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_LEVEL: &str = "NATSUM__LOGGING__LEVEL";
    const ENV_FORMAT: &str = "NATSUM__LOGGING__FORMAT";

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write yaml");
        file
    }

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset([ENV_LEVEL, ENV_FORMAT], f)
    }

    #[test]
    fn defaults_without_sources() {
        let config = without_env(|| AppConfig::load_layered(None)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(!config.logging.ansi);
    }

    #[test]
    fn yaml_overrides_defaults() {
        let file = yaml_file("logging:\n  level: warn\n  format: json\n");
        let config = without_env(|| AppConfig::load_layered(Some(file.path()))).unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn env_overrides_yaml() {
        let file = yaml_file("logging:\n  level: warn\n");
        let config = temp_env::with_vars(
            [(ENV_LEVEL, Some("debug")), (ENV_FORMAT, None)],
            || AppConfig::load_layered(Some(file.path())),
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("/nonexistent/natsum.yaml");
        let err = without_env(|| AppConfig::load_layered(Some(path))).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = yaml_file("logging:\n  colour: true\n");
        let err = without_env(|| AppConfig::load_layered(Some(file.path()))).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let file = yaml_file("logging:\n  level: \"natsum_core=loud\"\n");
        let err = without_env(|| AppConfig::load_layered(Some(file.path()))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel { .. }));
    }

    #[test]
    fn directive_lists_are_accepted() {
        let mut config = AppConfig::default();
        "warn,natsum_core=debug".clone_into(&mut config.logging.level);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn verbosity_raises_level() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config.logging.level, "info");

        config.apply_cli_overrides(&CliArgs {
            verbose: 1,
            ..CliArgs::default()
        });
        assert_eq!(config.logging.level, "debug");

        config.apply_cli_overrides(&CliArgs {
            verbose: 3,
            ..CliArgs::default()
        });
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn yaml_rendering_contains_logging_section() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("logging"));
        assert!(yaml.contains("level:"));
        assert!(yaml.contains("info"));
        assert!(yaml.contains("text"));
    }
}
