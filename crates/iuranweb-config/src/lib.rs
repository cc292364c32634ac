//! Configuration management for iuranweb
//!
//! This module handles loading, validation, and management of
//! iuranweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigReport, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Resident data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the resident snapshot (YAML)
    #[serde(default = "default_residents_file")]
    pub residents_file: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            residents_file: default_residents_file(),
        }
    }
}

fn default_residents_file() -> PathBuf {
    PathBuf::from("./data/residents.yaml")
}

/// QR export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory that receives server-side saves
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
    /// Leading part of every exported file name
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Image extension, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// Literal prefix of the transaction label
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
    /// Timeout for fetching the remote QR image
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
            label_prefix: default_label_prefix(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_file_prefix() -> String {
    "QRIS".to_string()
}

fn default_file_extension() -> String {
    "png".to_string()
}

fn default_label_prefix() -> String {
    "TRX".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

/// One line of the dues breakdown shown on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuesComponent {
    pub label: String,
    pub amount: u64,
}

/// Billing display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Currency symbol placed before amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// What the per-resident amount is made of (display only)
    #[serde(default)]
    pub components: Vec<DuesComponent>,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            components: Vec::new(),
        }
    }
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

impl BillingConfig {
    /// Sum of all configured components
    pub fn components_total(&self) -> u64 {
        self.components.iter().map(|c| c.amount).sum()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Resident data settings
    #[serde(default)]
    pub data: DataConfig,
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Billing display settings
    #[serde(default)]
    pub billing: BillingConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration without blocking the runtime
    pub async fn load_async(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Unreadable {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        let prefix = &self.export.file_prefix;
        if prefix.starts_with('.') || prefix.contains(['/', '\\', '\0']) {
            return Err(ConfigError::InvalidValue {
                field: "export.file_prefix".to_string(),
                reason: "File prefix must not start with a dot or contain path separators".to_string(),
            });
        }

        let ext = &self.export.file_extension;
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidValue {
                field: "export.file_extension".to_string(),
                reason: "Extension must be non-empty and alphanumeric (no dot)".to_string(),
            });
        }

        if self.export.label_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "export.label_prefix".to_string(),
                reason: "Label prefix must not be empty".to_string(),
            });
        }

        if !(1..=300).contains(&self.export.fetch_timeout_secs) {
            return Err(ConfigError::InvalidValue {
                field: "export.fetch_timeout_secs".to_string(),
                reason: "Fetch timeout must be between 1 and 300 seconds".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.export.file_prefix, "QRIS");
        assert_eq!(config.export.file_extension, "png");
        assert_eq!(config.export.label_prefix, "TRX");
        assert_eq!(config.billing.currency_symbol, "Rp");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.billing.components.len(), 2);
        assert_eq!(config.billing.components_total(), 175000);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_yaml("export:\n  directory: /tmp/qr\n").unwrap();
        assert_eq!(config.export.directory, PathBuf::from("/tmp/qr"));
        assert_eq!(config.export.fetch_timeout_secs, 30);
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_rejects_dotted_extension() {
        let err = Config::from_yaml("export:\n  file_extension: .png\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "export.file_extension"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Config::from_yaml("logging:\n  level: loud\n").is_err());
        assert!(Config::from_yaml("logging:\n  level: DEBUG\n").is_ok());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_rejects_unsafe_file_prefix() {
        for prefix in ["qr/codes", "qr\\codes", ".QRIS"] {
            let yaml = format!("export:\n  file_prefix: '{}'\n", prefix);
            let err = Config::from_yaml(&yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "export.file_prefix"),
                "prefix {:?} accepted",
                prefix
            );
        }
        assert!(Config::from_yaml("export:\n  file_prefix: IURAN\n").is_ok());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = Config::load_async(Path::new("/definitely/not/here.yaml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server:\n  port: 9090\n").unwrap();
        let config = Config::load_async(&path).await.unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }
}
