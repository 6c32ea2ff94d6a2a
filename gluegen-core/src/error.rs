//! Error types for catalog export and template generation.
//!
//! Only a handful of conditions are fatal to a run. Rejected catalog calls are
//! represented here as [`GlueGenError::ServiceCall`] so the catalog reader can
//! recognise them and degrade to an empty result instead of aborting.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for gluegen operations.
#[derive(Debug, Error)]
pub enum GlueGenError {
    /// Missing or unusable run configuration (properties file, region)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The catalog service answered but rejected the call
    #[error("Catalog call {operation} was rejected (status {}): {message}", display_status(.status))]
    ServiceCall {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Transport, credential or response-parsing failure talking to the catalog
    #[error("Catalog access failed: {context}")]
    Catalog {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Merge requested for a record that was never staged
    #[error("No staged record '{name}' at {}", .path.display())]
    MissingStagedRecord { name: String, path: PathBuf },

    /// A template path cannot be written because a non-object value is in the way
    #[error("Template {} has no object at '{path}'", .template.display())]
    TemplateShape { template: PathBuf, path: String },

    /// Working directory could not be recreated
    #[error("Failed to reset directory {}", .path.display())]
    DirectoryReset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Column definition line did not contain a name and a type
    #[error("Malformed column definition on line {line}: '{content}'")]
    ColumnFormat { line: usize, content: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with GlueGenError
pub type Result<T> = std::result::Result<T, GlueGenError>;

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "unknown".to_string(), |code| code.to_string())
}

impl GlueGenError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a rejected-call error for a catalog operation
    pub fn service_call(
        operation: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::ServiceCall {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a fatal catalog access error with context
    pub fn catalog_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Catalog {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates an I/O error naming the path involved
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("Failed to {} {}", action, path.display()),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Returns true for rejected catalog calls, which the reader treats as empty results.
    pub const fn is_service_rejection(&self) -> bool {
        matches!(self, Self::ServiceCall { .. })
    }
}
