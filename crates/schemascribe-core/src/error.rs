//! Error taxonomy for the generation pipeline
//!
//! Each phase owns one error type. None of these are retried internally;
//! they indicate either a caller configuration defect or an environment
//! condition outside the pipeline's control.

use crate::model::ObjectKind;

/// Connection or introspection failure during snapshot capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("failed to enumerate schema '{schema}': {reason}")]
    EnumerationFailed { schema: String, reason: String },
}

/// Incompatible or malformed snapshots during comparison
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error(
        "snapshots cover incompatible object categories (reference: {reference:?}, comparison: {comparison:?})"
    )]
    IncompatibleCategories {
        reference: Vec<ObjectKind>,
        comparison: Vec<ObjectKind>,
    },
}

/// I/O or serialization failure on the output target
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to write changelog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize changelog: {0}")]
    Serialization(String),
}

/// Invalid generation arguments
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("comparison scope names no schemas")]
    EmptySchemaScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = CaptureError::SchemaNotFound("audit".to_string());
        assert_eq!(err.to_string(), "schema not found: audit");

        let err = ValidationError::EmptySchemaScope;
        assert_eq!(err.to_string(), "comparison scope names no schemas");
    }
}
