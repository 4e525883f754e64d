//! Console configuration.
//!
//! Layered with `figment`: built-in defaults, then an optional YAML file, then
//! `CATALOG_CONSOLE__*` environment variables (`__` separates nested keys,
//! e.g. `CATALOG_CONSOLE__LOGGING__JSON=true`).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "CATALOG_CONSOLE__";

const DEFAULT_PER_PAGE: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);
const DEFAULT_TENANT_OPTIONS_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(99);
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `info,console_sdk=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Initial page size of every list view.
    pub per_page: NonZeroU32,
    /// Quiescence window of the search box.
    pub search_debounce_ms: u64,
    /// How many tenants the product form offers in its tenant picker.
    pub tenant_options_page_size: NonZeroU32,
    pub logging: LoggingConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            tenant_options_page_size: DEFAULT_TENANT_OPTIONS_PAGE_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load defaults, the optional YAML file and environment overrides.
    ///
    /// # Errors
    /// `NotFound` when `path` is given but missing; `Extract` for unknown
    /// keys or values of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Self::base(path)?;
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Defaults plus the optional YAML file, without the environment layer.
    ///
    /// # Errors
    /// `NotFound` when `path` is given but missing.
    pub fn base(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        Ok(figment)
    }

    /// # Errors
    /// `Extract` when the merged layers do not form a valid config.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        tracing::debug!(
            per_page = config.per_page.get(),
            search_debounce_ms = config.search_debounce_ms,
            "console configuration loaded"
        );
        Ok(config)
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;

    fn yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = ConsoleConfig::from_figment(&ConsoleConfig::base(None).unwrap()).unwrap();
        assert_eq!(config.per_page.get(), 10);
        assert_eq!(config.tenant_options_page_size.get(), 100);
        assert_eq!(config.search_debounce(), Duration::from_millis(500));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn yaml_overrides_defaults() {
        let file = yaml("per_page: 25\nlogging:\n  json: true\n");
        let config =
            ConsoleConfig::from_figment(&ConsoleConfig::base(Some(file.path())).unwrap()).unwrap();
        assert_eq!(config.per_page.get(), 25);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let file = yaml("per_page: 0\n");
        let err = ConsoleConfig::from_figment(&ConsoleConfig::base(Some(file.path())).unwrap())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = yaml("perPage: 25\n");
        let err = ConsoleConfig::from_figment(&ConsoleConfig::base(Some(file.path())).unwrap())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ConsoleConfig::base(Some(Path::new("/nonexistent/console.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("console.yaml", "per_page: 50\nsearch_debounce_ms: 300\n")?;
            jail.set_env("CATALOG_CONSOLE__PER_PAGE", 25);
            jail.set_env("CATALOG_CONSOLE__LOGGING__JSON", true);

            let config = ConsoleConfig::load(Some(Path::new("console.yaml")))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.per_page.get(), 25);
            assert!(config.logging.json);
            assert_eq!(config.search_debounce(), Duration::from_millis(300));
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn later_layers_override_file() {
        let file = yaml("search_debounce_ms: 300\n");
        let figment = ConsoleConfig::base(Some(file.path()))
            .unwrap()
            .merge(Serialized::default("search_debounce_ms", 50));
        let config = ConsoleConfig::from_figment(&figment).unwrap();
        assert_eq!(config.search_debounce(), Duration::from_millis(50));
    }
}
