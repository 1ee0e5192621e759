//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::dashboard::LabelZone;
use crate::fetch::{FetchError, FileSnapshotSource, HttpSnapshotSource, SnapshotSource};
use crate::poller::{self, CycleMode};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where snapshots are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Http,
    File,
}

/// Snapshot source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    #[serde(default = "default_snapshot_path")]
    pub file_path: String,

    /// Unset keeps the HTTP client's default
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_snapshot_path() -> String {
    "assets/mock-data.json".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base_url: default_base_url(),
            snapshot_path: default_snapshot_path(),
            file_path: default_snapshot_path(),
            request_timeout_secs: None,
        }
    }
}

impl SourceConfig {
    /// Build the configured snapshot source
    pub fn build(&self) -> Result<Arc<dyn SnapshotSource>, FetchError> {
        match self.kind {
            SourceKind::Http => {
                let timeout = self.request_timeout_secs.map(Duration::from_secs);
                let source =
                    HttpSnapshotSource::new(&self.base_url, &self.snapshot_path, timeout)?;
                Ok(Arc::new(source))
            }
            SourceKind::File => Ok(Arc::new(FileSnapshotSource::new(&self.file_path))),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    #[serde(default)]
    pub cycle_mode: CycleMode,
}

fn default_interval() -> u64 {
    5000 // 5 seconds
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            cycle_mode: CycleMode::default(),
        }
    }
}

impl From<&PollerConfig> for poller::PollerConfig {
    fn from(config: &PollerConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms.max(1)),
            mode: config.cycle_mode,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub label_timezone: LabelZone,
}

/// Dashboard view server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_enabled")]
    pub enabled: bool,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_enabled() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8085
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: default_api_enabled(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
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
            dirs::config_dir().map(|p| p.join("cycledash").join("config.toml")),
            Some(PathBuf::from("/etc/cycledash/config.toml")),
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

    /// Apply `CYCLEDASH_*` overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source overrides
        match var("CYCLEDASH_SOURCE_KIND").as_deref() {
            Some("http") => self.source.kind = SourceKind::Http,
            Some("file") => self.source.kind = SourceKind::File,
            _ => {}
        }
        if let Some(url) = var("CYCLEDASH_BASE_URL") {
            self.source.base_url = url;
        }
        if let Some(path) = var("CYCLEDASH_SNAPSHOT_PATH") {
            self.source.snapshot_path = path;
        }
        if let Some(path) = var("CYCLEDASH_SNAPSHOT_FILE") {
            self.source.file_path = path;
        }

        // Poller overrides
        if let Some(interval) = var("CYCLEDASH_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.poller.interval_ms = ms;
            }
        }
        match var("CYCLEDASH_CYCLE_MODE").as_deref() {
            Some("serialized") => self.poller.cycle_mode = CycleMode::Serialized,
            Some("overlapping") => self.poller.cycle_mode = CycleMode::Overlapping,
            _ => {}
        }

        // API overrides
        if let Some(enabled) = var("CYCLEDASH_API_ENABLED") {
            if let Ok(b) = enabled.parse() {
                self.api.enabled = b;
            }
        }
        if let Some(host) = var("CYCLEDASH_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("CYCLEDASH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("CYCLEDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CYCLEDASH_LOG_FORMAT") {
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
    r#"# cycledash Configuration
#
# Environment variables override these settings:
# - CYCLEDASH_SOURCE_KIND
# - CYCLEDASH_BASE_URL
# - CYCLEDASH_SNAPSHOT_PATH
# - CYCLEDASH_SNAPSHOT_FILE
# - CYCLEDASH_POLL_INTERVAL_MS
# - CYCLEDASH_CYCLE_MODE
# - CYCLEDASH_API_ENABLED
# - CYCLEDASH_API_HOST
# - CYCLEDASH_API_PORT
# - CYCLEDASH_LOG_LEVEL
# - CYCLEDASH_LOG_FORMAT

[source]
# Snapshot source: http or file
kind = "http"

# Base URL the snapshot path is resolved against
base_url = "http://localhost:8000/"

# Snapshot path relative to base_url
snapshot_path = "assets/mock-data.json"

# Snapshot file (kind = "file")
file_path = "assets/mock-data.json"

# Request timeout in seconds (unset = HTTP client default)
# request_timeout_secs = 10

[poller]
# Time between poll cycles (ms)
interval_ms = 5000

# serialized: wait for each cycle before starting the next
# overlapping: start a cycle on every tick regardless
cycle_mode = "serialized"

[dashboard]
# Time zone for chart time labels: local or utc
label_timezone = "local"

[api]
# Serve the rendered dashboard over HTTP
enabled = true

# Dashboard view host
host = "127.0.0.1"

# Dashboard view port
port = 8085

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
        assert_eq!(config.source.kind, SourceKind::Http);
        assert_eq!(config.source.snapshot_path, "assets/mock-data.json");
        assert_eq!(config.poller.interval_ms, 5000);
        assert_eq!(config.poller.cycle_mode, CycleMode::Serialized);
        assert_eq!(config.dashboard.label_timezone, LabelZone::Local);
        assert_eq!(config.api.addr(), "127.0.0.1:8085");
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.poller.interval_ms, defaults.poller.interval_ms);
        assert_eq!(config.api.port, defaults.api.port);
        assert_eq!(config.logging.format, defaults.logging.format);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[poller]\ninterval_ms = 1000\ncycle_mode = \"overlapping\"\n\n[source]\nkind = \"file\"\nfile_path = \"/tmp/snap.json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.poller.interval_ms, 1000);
        assert_eq!(config.poller.cycle_mode, CycleMode::Overlapping);
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.file_path, "/tmp/snap.json");
        assert_eq!(config.api.port, 8085);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        let missing = Config::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[poller\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CYCLEDASH_SOURCE_KIND", "file"),
            ("CYCLEDASH_POLL_INTERVAL_MS", "250"),
            ("CYCLEDASH_CYCLE_MODE", "overlapping"),
            ("CYCLEDASH_API_PORT", "not-a-port"),
            ("CYCLEDASH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.poller.interval_ms, 250);
        assert_eq!(config.poller.cycle_mode, CycleMode::Overlapping);
        assert_eq!(config.api.port, 8085);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_poller_conversion() {
        let section = PollerConfig {
            interval_ms: 0,
            cycle_mode: CycleMode::Overlapping,
        };
        let runtime = poller::PollerConfig::from(&section);
        assert_eq!(runtime.interval, Duration::from_millis(1));
        assert_eq!(runtime.mode, CycleMode::Overlapping);
    }

    #[test]
    fn test_build_sources() {
        let mut source = SourceConfig::default();
        assert!(source.build().unwrap().describe().ends_with("assets/mock-data.json"));

        source.kind = SourceKind::File;
        source.file_path = "/tmp/x.json".to_string();
        assert_eq!(source.build().unwrap().describe(), "/tmp/x.json");

        source.kind = SourceKind::Http;
        source.base_url = "::".to_string();
        assert!(source.build().is_err());
    }
}
