//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::store::{Latency, StoreConfig, DEFAULT_BUDGET_AMOUNT};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Directory with seed JSON files; embedded fixtures when unset
    #[serde(default)]
    pub seed_dir: Option<String>,

    #[serde(default = "default_simulate_latency")]
    pub simulate_latency: bool,

    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,

    #[serde(default = "default_budget")]
    pub default_budget: f64,
}

fn default_simulate_latency() -> bool {
    true
}

fn default_latency_scale() -> f64 {
    1.0
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET_AMOUNT
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_dir: None,
            simulate_latency: default_simulate_latency(),
            latency_scale: default_latency_scale(),
            default_budget: default_budget(),
        }
    }
}

impl StoreSettings {
    /// Convert into the store's runtime config
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            latency: Latency {
                enabled: self.simulate_latency,
                scale: self.latency_scale,
            },
            default_budget: self.default_budget,
            seed_dir: self.seed_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bookwise").join("config.toml")),
            Some(PathBuf::from("/etc/bookwise/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparseable numbers are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Store overrides
        if let Some(dir) = lookup("BOOKWISE_SEED_DIR") {
            self.store.seed_dir = Some(dir);
        }
        if let Some(flag) = lookup("BOOKWISE_SIMULATE_LATENCY") {
            self.store.simulate_latency = flag.to_lowercase() != "false" && flag != "0";
        }
        if let Some(scale) = lookup("BOOKWISE_LATENCY_SCALE").and_then(|s| s.parse().ok()) {
            self.store.latency_scale = scale;
        }
        if let Some(budget) = lookup("BOOKWISE_DEFAULT_BUDGET").and_then(|s| s.parse().ok()) {
            self.store.default_budget = budget;
        }

        // API overrides
        if let Some(host) = lookup("BOOKWISE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("BOOKWISE_API_PORT").and_then(|s| s.parse().ok()) {
            self.api.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("BOOKWISE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BOOKWISE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# BookWise Configuration
#
# Environment variables override these settings:
# - BOOKWISE_SEED_DIR
# - BOOKWISE_SIMULATE_LATENCY
# - BOOKWISE_LATENCY_SCALE
# - BOOKWISE_DEFAULT_BUDGET
# - BOOKWISE_API_HOST
# - BOOKWISE_API_PORT
# - BOOKWISE_LOG_LEVEL
# - BOOKWISE_LOG_FORMAT

[store]
# Directory holding books.json, budget.json, wishlist.json, preferences.json.
# Missing files fall back to the built-in catalog.
# seed_dir = "./data"

# Delay every operation like a remote service would
simulate_latency = true

# Multiplier applied to the per-operation delay (0.5 = twice as fast)
latency_scale = 1.0

# Budget given to a month the first time it is opened
default_budget = 1000.0

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.store.simulate_latency);
        assert_eq!(config.store.default_budget, 1000.0);
        assert_eq!(config.api.addr(), "0.0.0.0:8090");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.store.latency_scale, 1.0);
        assert!(config.store.seed_dir.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[store]\nsimulate_latency = false\nseed_dir = \"/tmp/seed\"\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.store.simulate_latency);
        assert_eq!(config.store.default_budget, 1000.0);
        assert!(config.logging.is_json());

        let store = config.store.to_store_config();
        assert!(!store.latency.enabled);
        assert_eq!(store.seed_dir, Some(PathBuf::from("/tmp/seed")));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api]\nport = \"not a number\"\n").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("BOOKWISE_SIMULATE_LATENCY", "0"),
            ("BOOKWISE_LATENCY_SCALE", "0.25"),
            ("BOOKWISE_DEFAULT_BUDGET", "1500"),
            ("BOOKWISE_API_PORT", "not-a-port"),
            ("BOOKWISE_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert!(!config.store.simulate_latency);
        assert_eq!(config.store.latency_scale, 0.25);
        assert_eq!(config.store.default_budget, 1500.0);
        // Bad port is ignored
        assert_eq!(config.api.port, 8090);
        assert!(config.logging.is_json());
    }
}
