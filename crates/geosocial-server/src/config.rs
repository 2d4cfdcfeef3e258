//! Configuration management for the geosocial server.
//!
//! Configuration is assembled from three layers:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use geosocial_server::config::ServerConfig;
//!
//! let config = ServerConfig::load("geosocial.yaml")?;
//! let params = config.query_params()?;
//! ```

use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use geosocial_domain::search::DEFAULT_MAX_HOPS_LIMIT;
use geosocial_domain::{DomainError, QueryModeKind, QueryParams, SearchConfig, VisitPolicy};

/// Environment variable prefix, e.g. `GEOSOCIAL_QUERY__MAX_HOPS=3`.
const ENV_PREFIX: &str = "GEOSOCIAL";

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Default query parameters
    #[serde(default)]
    pub query: QuerySettings,

    /// Engine-wide traversal settings
    #[serde(default)]
    pub search: SearchSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Query parameters used when a request does not carry its own.
///
/// Only the fields of the selected `mode` are read:
///
/// ```yaml
/// query:
///   mode: similarity        # or "distance" (alias "kd-truss")
///   max_hops: 2
///   keyword_weight: 0.5
///   relationship_weight: 0.5
///   threshold: 0.2
///   cohesiveness: 1
///   max_distance: 10.0
///   required_keywords: 1
///   time_overlap: 0.5       # optional
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct QuerySettings {
    /// Query mode name
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_max_hops")]
    pub max_hops: u32,

    /// Weight `g` of the keyword score
    #[serde(default = "default_weight")]
    pub keyword_weight: f64,

    /// Weight `h` of the relationship score
    #[serde(default = "default_weight")]
    pub relationship_weight: f64,

    /// Similarity threshold `η`
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Minimum common keywords `k` in similarity mode
    #[serde(default)]
    pub cohesiveness: usize,

    /// Largest accumulated edge weight in distance mode
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,

    /// Minimum common keywords in distance mode
    #[serde(default = "default_required_keywords")]
    pub required_keywords: usize,

    /// Required time-window overlap fraction, disabled when absent
    #[serde(default)]
    pub time_overlap: Option<f64>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            max_hops: default_max_hops(),
            keyword_weight: default_weight(),
            relationship_weight: default_weight(),
            threshold: default_threshold(),
            cohesiveness: 0,
            max_distance: default_max_distance(),
            required_keywords: default_required_keywords(),
            time_overlap: None,
        }
    }
}

fn default_mode() -> String {
    "similarity".to_string()
}

fn default_max_hops() -> u32 {
    2
}

fn default_weight() -> f64 {
    0.5
}

fn default_threshold() -> f64 {
    0.2
}

fn default_max_distance() -> f64 {
    10.0
}

fn default_required_keywords() -> usize {
    1
}

/// Traversal settings shared by every query.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SearchSettings {
    /// Revisit rule: "global" or "per_path"
    #[serde(default = "default_visit_policy")]
    pub visit_policy: String,

    /// Largest `max_hops` a query may ask for
    #[serde(default = "default_max_hops_limit")]
    pub max_hops_limit: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            visit_policy: default_visit_policy(),
            max_hops_limit: default_max_hops_limit(),
        }
    }
}

fn default_visit_policy() -> String {
    "global".to_string()
}

fn default_max_hops_limit() -> u32 {
    DEFAULT_MAX_HOPS_LIMIT
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigLoadError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl From<DomainError> for ConfigLoadError {
    fn from(err: DomainError) -> Self {
        Self::invalid(format!("query: {err}"))
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `GEOSOCIAL_` and use `__` as
    /// separator, e.g. `GEOSOCIAL_QUERY__MODE=distance` overrides `query.mode`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    ///
    /// Every query setting is checked here so that a bad mode or threshold
    /// is reported at startup rather than on the first query.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.query.mode.parse::<QueryModeKind>().is_err() {
            return Err(ConfigLoadError::invalid(format!(
                "query.mode must be one of: [\"similarity\", \"distance\", \"kd-truss\"], got: {}",
                self.query.mode
            )));
        }

        let search = self.search_config()?;
        if self.query.max_hops > search.max_hops_limit {
            return Err(ConfigLoadError::invalid(format!(
                "query.max_hops {} exceeds search.max_hops_limit {}",
                self.query.max_hops, search.max_hops_limit
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::invalid(format!(
                "logging.level must be one of: {:?}, got: {}",
                valid_levels, self.logging.level
            )));
        }

        self.query_params()?;
        Ok(())
    }

    /// Builds validated query parameters from the `query` section.
    pub fn query_params(&self) -> Result<QueryParams, ConfigLoadError> {
        let settings = &self.query;
        let mut params = match settings.mode.parse::<QueryModeKind>()? {
            QueryModeKind::Similarity => QueryParams::similarity(
                settings.max_hops,
                settings.keyword_weight,
                settings.relationship_weight,
                settings.threshold,
                settings.cohesiveness,
            ),
            QueryModeKind::Distance => QueryParams::distance(
                settings.max_hops,
                settings.max_distance,
                settings.required_keywords,
            ),
        };
        if let Some(fraction) = settings.time_overlap {
            params = params.with_time_overlap(fraction);
        }
        params.validate()?;
        Ok(params)
    }

    /// Builds the engine configuration from the `search` section.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigLoadError> {
        let visit_policy = match self.search.visit_policy.to_lowercase().as_str() {
            "global" => VisitPolicy::Global,
            "per_path" | "per-path" => VisitPolicy::PerPath,
            other => {
                return Err(ConfigLoadError::invalid(format!(
                    "search.visit_policy must be one of: [\"global\", \"per_path\"], got: {other}"
                )))
            }
        };
        Ok(SearchConfig::default()
            .with_visit_policy(visit_policy)
            .with_max_hops_limit(self.search.max_hops_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosocial_domain::QueryMode;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test: Can load config from YAML file
    #[test]
    #[serial]
    fn test_can_load_config_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
query:
  mode: distance
  max_hops: 3
  max_distance: 4.0
  required_keywords: 2
  time_overlap: 0.5

search:
  visit_policy: per_path
  max_hops_limit: 10

logging:
  level: debug
  json: true
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();

        assert_eq!(config.query.mode, "distance");
        assert_eq!(config.query.max_hops, 3);
        assert_eq!(config.query.required_keywords, 2);
        assert_eq!(config.query.time_overlap, Some(0.5));
        assert_eq!(config.search.visit_policy, "per_path");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let params = config.query_params().unwrap();
        assert_eq!(params.max_hops, 3);
        assert_eq!(
            params.mode,
            QueryMode::Distance {
                max_distance: 4.0,
                required_keywords: 2
            }
        );
        assert_eq!(params.time_overlap, Some(0.5));

        let search = config.search_config().unwrap();
        assert_eq!(search.visit_policy, VisitPolicy::PerPath);
        assert_eq!(search.max_hops_limit, 10);
    }

    /// Test: Can override config with env vars
    #[test]
    #[serial]
    fn test_can_override_config_with_env_vars() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
query:
  mode: similarity
  max_hops: 1
"#
        )
        .unwrap();

        std::env::set_var("GEOSOCIAL_QUERY__MAX_HOPS", "4");
        std::env::set_var("GEOSOCIAL_LOGGING__LEVEL", "warn");

        let config = ServerConfig::load(file.path());

        std::env::remove_var("GEOSOCIAL_QUERY__MAX_HOPS");
        std::env::remove_var("GEOSOCIAL_LOGGING__LEVEL");

        let config = config.unwrap();
        assert_eq!(config.query.max_hops, 4);
        assert_eq!(config.query.mode, "similarity");
        assert_eq!(config.logging.level, "warn");
    }

    /// Test: Unknown query mode is rejected before any query runs
    #[test]
    #[serial]
    fn test_unknown_mode_is_rejected_at_load() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "query:\n  mode: poi").unwrap();

        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid { .. }));
        assert!(err.to_string().contains("query.mode"));
        assert!(err.to_string().contains("poi"));
    }

    #[test]
    fn test_kd_truss_alias_selects_distance_mode() {
        let mut config = ServerConfig::default();
        config.query.mode = "kd-truss".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.query_params().unwrap().mode.kind(),
            QueryModeKind::Distance
        );
    }

    /// Test: Config validation catches errors
    #[test]
    fn test_config_validation_catches_errors() {
        let mut config = ServerConfig::default();
        config.query.threshold = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold"));

        let mut config = ServerConfig::default();
        config.query.time_overlap = Some(1.5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("time_overlap"));

        let mut config = ServerConfig::default();
        config.query.mode = "distance".to_string();
        config.query.max_distance = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.query.max_hops = 30;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_hops_limit"));

        let mut config = ServerConfig::default();
        config.search.visit_policy = "sometimes".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("search.visit_policy"));

        let mut config = ServerConfig::default();
        config.logging.level = "invalid".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    /// Test: Invalid config returns clear error
    #[test]
    fn test_invalid_config_returns_clear_error() {
        let result = ServerConfig::load("/nonexistent/path/geosocial.yaml");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileNotFound { .. }));
        assert!(err.to_string().contains("not found"));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid: yaml: syntax: [").unwrap();

        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Load(_)));
    }

    /// Test: Default config is valid
    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.query.mode, "similarity");
        assert_eq!(config.query.max_hops, 2);
        assert_eq!(config.query.time_overlap, None);
        assert_eq!(config.search.visit_policy, "global");
        assert_eq!(config.search.max_hops_limit, DEFAULT_MAX_HOPS_LIMIT);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);

        assert_eq!(
            config.query_params().unwrap(),
            QueryParams::similarity(2, 0.5, 0.5, 0.2, 0)
        );
        assert_eq!(config.search_config().unwrap(), SearchConfig::default());
    }

    /// Test: from_env loads defaults with env overrides
    #[test]
    #[serial]
    fn test_from_env_loads_defaults_with_env_overrides() {
        std::env::set_var("GEOSOCIAL_QUERY__MODE", "distance");

        let config = ServerConfig::from_env();

        std::env::remove_var("GEOSOCIAL_QUERY__MODE");

        let config = config.unwrap();
        assert_eq!(config.query.mode, "distance");
        assert_eq!(config.query.max_hops, 2);
    }
}
