//! Configuration errors
//!
//! Every error names the file or config key it is about, and the startup
//! report adds a hint for that key.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Could not read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Invalid YAML: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::FileNotFound { .. } => "FILE_NOT_FOUND",
            ConfigError::Unreadable { .. } => "UNREADABLE",
            ConfigError::InvalidYaml { .. } => "INVALID_YAML",
            ConfigError::InvalidValue { .. } => "INVALID_VALUE",
        }
    }

    /// What gets printed when startup aborts
    pub fn to_details(&self) -> ConfigReport {
        let (field, hint) = match self {
            ConfigError::FileNotFound { .. } => (
                None,
                Some("Create one with `iuranweb --print-default-config > config.yaml`."),
            ),
            ConfigError::Unreadable { .. } => (None, None),
            ConfigError::InvalidYaml { .. } => {
                (None, Some("Compare with the output of --print-default-config."))
            }
            ConfigError::InvalidValue { field, .. } => (Some(field.clone()), field_hint(field)),
        };
        ConfigReport {
            code: self.code(),
            message: self.to_string(),
            field,
            hint: hint.map(str::to_string),
        }
    }
}

fn field_hint(field: &str) -> Option<&'static str> {
    match field {
        "server.port" => Some("Any port from 1 to 65535; the default is 8081."),
        "export.file_prefix" => Some("Use a plain word such as QRIS, without slashes or a leading dot."),
        "export.file_extension" => Some("Use a bare extension such as png."),
        "export.label_prefix" => Some("TRX is the usual label prefix."),
        "export.fetch_timeout_secs" => Some("30 seconds suits most connections."),
        "logging.level" => Some("RUST_LOG still overrides this at runtime."),
        _ => None,
    }
}

/// Startup report for a configuration error
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\nHint: {}", hint)?;
        }
        Ok(())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
