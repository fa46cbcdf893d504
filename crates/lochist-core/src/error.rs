//! Error types for Lochist

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LochistError {
    // Record-level errors
    #[error("Malformed timestamp: {value:?}")]
    MalformedTimestamp { value: String },

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid coordinate {value:?}: {reason}")]
    InvalidCoordinate { value: String, reason: String },

    // Input errors
    #[error("File not found: {path}")]
    ResourceNotFound { path: PathBuf },

    #[error("Malformed input in {path}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    // Geocoder errors
    #[error("Geocoding unavailable: {reason}")]
    GeocodingUnavailable { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LochistError {
    fn from(e: serde_json::Error) -> Self {
        LochistError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LochistError>;

/// Category of a recovered, item-level problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MalformedTimestamp,
    MissingField,
    InvalidCoordinate,
    MalformedInput,
    ResourceNotFound,
}

/// A data-quality problem that was isolated to one item and did not stop the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Convert a recoverable error into a diagnostic.
    ///
    /// Returns `None` for errors that are never item-level (IO, config, geocoder).
    pub fn from_error(error: &LochistError) -> Option<Self> {
        let kind = match error {
            LochistError::MalformedTimestamp { .. } => DiagnosticKind::MalformedTimestamp,
            LochistError::MissingField { .. } => DiagnosticKind::MissingField,
            LochistError::InvalidCoordinate { .. } => DiagnosticKind::InvalidCoordinate,
            LochistError::MalformedInput { .. } => DiagnosticKind::MalformedInput,
            LochistError::ResourceNotFound { .. } => DiagnosticKind::ResourceNotFound,
            _ => return None,
        };
        Some(Self::new(kind, error.to_string()))
    }

    /// Same as [`Diagnostic::from_error`] with a location prefix on the message
    pub fn at(location: impl fmt::Display, error: &LochistError) -> Option<Self> {
        Self::from_error(error).map(|d| Self::new(d.kind, format!("{}: {}", location, d.message)))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_from_record_error() {
        let err = LochistError::MalformedTimestamp { value: "yesterday".to_string() };
        let diag = Diagnostic::from_error(&err).unwrap();
        assert_eq!(diag.kind, DiagnosticKind::MalformedTimestamp);
        assert!(diag.message.contains("yesterday"));
    }

    #[test]
    fn test_diagnostic_with_location() {
        let err = LochistError::MissingField {
            field: "startTime".to_string(),
            context: "segment".to_string(),
        };
        let diag = Diagnostic::at("semanticSegments[3]", &err).unwrap();
        assert_eq!(diag.kind, DiagnosticKind::MissingField);
        assert!(diag.message.starts_with("semanticSegments[3]: "));
    }

    #[test]
    fn test_ambient_errors_are_not_diagnostics() {
        let err = LochistError::GeocodingUnavailable { reason: "timeout".to_string() };
        assert!(Diagnostic::from_error(&err).is_none());
    }
}
