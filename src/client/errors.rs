//! # Client Errors

use thiserror::Error;

use crate::annotation::ValidationError;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Remote labeling API errors
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // Lookup errors
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Project {0} has no ontology; set it up before exporting")]
    ProjectNotSetUp(String),

    // Payload errors
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid export document: {0}")]
    InvalidExport(String),

    // Consistency
    #[error("Condition not met after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        ClientError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::NotFound { .. } => "LABELKIT_NOT_FOUND",
            ClientError::ProjectNotSetUp(_) => "LABELKIT_PROJECT_NOT_SET_UP",
            ClientError::Validation(e) => e.kind().code(),
            ClientError::InvalidExport(_) => "LABELKIT_INVALID_EXPORT",
            ClientError::PollTimeout { .. } => "LABELKIT_POLL_TIMEOUT",
            ClientError::Config(_) => "LABELKIT_CONFIG_ERROR",
            ClientError::Internal(_) => "LABELKIT_INTERNAL",
        }
    }
}
