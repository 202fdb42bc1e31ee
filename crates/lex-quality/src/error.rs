//! Custom error types for the data quality pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Load errors are
//! fatal to a run and surface unchanged; backend errors are recovered inside the
//! detection and suggestion stages and only show up here when a caller drives a
//! generative component directly.
//!
//! Errors are serializable so the CLI can emit them in machine-readable form.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the data quality pipeline.
#[derive(Error, Debug)]
pub enum QualityError {
    /// The table path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The table file extension is not recognized.
    #[error("Unsupported file format: '{extension}' (supported formats: .csv, .parquet, .pq)")]
    UnsupportedFormat { extension: String },

    /// The table file contains no data.
    #[error("File is empty: {0}")]
    EmptyTable(String),

    /// The table file could not be parsed.
    #[error("Failed to parse '{path}': {reason}")]
    ParseFailure { path: String, reason: String },

    /// Data profiling failed.
    #[error("Failed to profile table: {0}")]
    ProfilingFailed(String),

    /// Generative backend call or response failure.
    #[error("Generative backend error: {0}")]
    Backend(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::EmptyTable(_) => "EMPTY_TABLE",
            Self::ParseFailure { .. } => "PARSE_FAILURE",
            Self::ProfilingFailed(_) => "PROFILING_FAILED",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from loading the table.
    pub fn is_load_error(&self) -> bool {
        match self {
            Self::NotFound(_)
            | Self::UnsupportedFormat { .. }
            | Self::EmptyTable(_)
            | Self::ParseFailure { .. } => true,
            Self::WithContext { source, .. } => source.is_load_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for data quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Io(e).with_context(context))
    }
}
