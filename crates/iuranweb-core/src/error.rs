//! Error types for iuranweb-core
//!
//! This module provides error handling for the resident directory and the
//! QR export flow, including error codes, detailed messages, and suggestions.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resident not found
    ResidentNotFound,
    /// Validation error
    ValidationError,
    /// IO error
    IoError,
    /// File not found
    FileNotFound,
    /// Invalid data format
    InvalidFormat,
    /// Duplicate entry
    DuplicateEntry,
    /// Remote QR image could not be fetched
    FetchFailed,
    /// Host save primitive rejected the file
    SaveFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ResidentNotFound => write!(f, "RESIDENT_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::FileNotFound => write!(f, "FILE_NOT_FOUND"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::SaveFailed => write!(f, "SAVE_FAILED"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for iuranweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Resident not found: {id}")]
    ResidentNotFound { id: u32 },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("IO error occurred")]
    IoError,

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Duplicate entry: {entry}")]
    DuplicateEntry { entry: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ResidentNotFound { .. } => ErrorCode::ResidentNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::IoError => ErrorCode::IoError,
            CoreError::FileNotFound { .. } => ErrorCode::FileNotFound,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::DuplicateEntry { .. } => ErrorCode::DuplicateEntry,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(
            self.code(),
            self.to_string(),
        );

        match self {
            CoreError::ResidentNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/residents endpoint to list all residents.".to_string()
                );
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details.with_suggestion(
                    "Every resident needs a positive id, a name and an address.".to_string()
                );
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
                details = details.with_suggestion(
                    "The residents file must be a YAML document with a `residents` list.".to_string()
                );
            }
            CoreError::FileNotFound { .. } => {
                details = details.with_suggestion(
                    "Check data.residents_file in the configuration.".to_string()
                );
            }
            CoreError::DuplicateEntry { .. } => {
                details = details.with_suggestion(
                    "Resident ids must be unique within the directory.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

/// Operator-facing text for any failed export
pub const EXPORT_FAILED_NOTICE: &str = "Gagal mengunduh QR Code. Silakan coba lagi.";

/// Failure of a single QR export attempt
///
/// Never fatal: callers show [`ExportError::user_notice`] and leave the
/// selection and filter query as they were.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    #[error("Failed to fetch QR image: {reason}")]
    FetchFailed { reason: String },

    #[error("Failed to save QR image: {reason}")]
    SaveFailed { reason: String },
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::FetchFailed { .. } => ErrorCode::FetchFailed,
            ExportError::SaveFailed { .. } => ErrorCode::SaveFailed,
        }
    }

    /// The single notice shown to the operator
    pub fn user_notice(&self) -> &'static str {
        EXPORT_FAILED_NOTICE
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::ResidentNotFound.to_string(), "RESIDENT_NOT_FOUND");
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
    }

    #[test]
    fn test_core_error_code() {
        let error = CoreError::ResidentNotFound { id: 7 };
        assert_eq!(error.code(), ErrorCode::ResidentNotFound);
        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn test_error_details_validation() {
        let error = CoreError::ValidationError { message: "name is empty".to_string() };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert!(details.details.is_some());
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_not_found_details_serialize() {
        let details = CoreError::ResidentNotFound { id: 3 }.to_details();
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["code"], "RESIDENT_NOT_FOUND");
        assert!(value.get("details").is_none());
        assert_eq!(value["suggestions"].as_array().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_io_error_conversion() {
        let error: CoreError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert_eq!(error.code(), ErrorCode::IoError);
    }

    #[test]
    fn test_export_error_notice() {
        let fetch = ExportError::FetchFailed { reason: "HTTP 404".to_string() };
        let save = ExportError::SaveFailed { reason: "read-only".to_string() };
        assert_eq!(fetch.code(), ErrorCode::FetchFailed);
        assert_eq!(save.code(), ErrorCode::SaveFailed);
        assert_eq!(fetch.user_notice(), save.user_notice());
        assert!(fetch.to_string().contains("HTTP 404"));
    }
}
