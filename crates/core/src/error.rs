//! Error types for Folio
//!
//! This module defines the error type used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Absence is not an error
//!
//! A lookup that resolves nothing (unknown item id, no published version,
//! ...) returns `Ok(None)`. `NotFound` only appears on the explicit
//! `*_required` lookups that turn absence into a failure.
//!
//! ## Handler failures
//!
//! A handler that rejects a transition returns `FolioError::Handler`. The
//! pipeline never wraps or swallows it: the caller receives exactly what the
//! handler returned.

use thiserror::Error;

/// Result type alias for Folio operations
pub type FolioResult<T> = std::result::Result<T, FolioError>;

/// Error types for Folio
#[derive(Debug, Error)]
pub enum FolioError {
    /// An explicitly required entity does not exist
    #[error("Not found: {entity}")]
    NotFound {
        /// Description of the missing entity
        entity: String,
    },

    /// Persistence collaborator failure
    #[error("Storage error: {message}")]
    Storage {
        /// Error detail
        message: String,
    },

    /// A content handler failed or vetoed a lifecycle stage
    #[error("Handler '{handler}' failed: {message}")]
    Handler {
        /// Name of the failing handler
        handler: String,
        /// Error detail
        message: String,
    },

    /// A record invariant (single latest, single published, ...) was broken
    #[error("Invariant violation: {reason}")]
    InvariantViolation {
        /// What was violated
        reason: String,
    },

    /// Caller supplied an invalid argument
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error detail
        message: String,
    },

    /// Operation is not valid in the current state
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Error detail
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error detail
        message: String,
    },

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error detail
        message: String,
    },

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal {
        /// Error detail
        message: String,
    },
}

impl FolioError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>) -> Self {
        FolioError::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        FolioError::Storage {
            message: message.into(),
        }
    }

    /// Create a Handler error
    ///
    /// This is how a handler vetoes a transition such as Publishing.
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        FolioError::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create an InvariantViolation error
    pub fn invariant(reason: impl Into<String>) -> Self {
        FolioError::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        FolioError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an InvalidOperation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        FolioError::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        FolioError::Config {
            message: message.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        FolioError::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, FolioError::NotFound { .. })
    }

    /// Check if this error came from the persistence collaborator
    pub fn is_storage_error(&self) -> bool {
        matches!(self, FolioError::Storage { .. })
    }

    /// Check if this error came from a content handler
    pub fn is_handler_error(&self) -> bool {
        matches!(self, FolioError::Handler { .. })
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FolioError::NotFound { .. } => "NotFound",
            FolioError::Storage { .. } => "Storage",
            FolioError::Handler { .. } => "Handler",
            FolioError::InvariantViolation { .. } => "InvariantViolation",
            FolioError::InvalidInput { .. } => "InvalidInput",
            FolioError::InvalidOperation { .. } => "InvalidOperation",
            FolioError::Serialization { .. } => "Serialization",
            FolioError::Config { .. } => "Config",
            FolioError::Internal { .. } => "Internal",
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        FolioError::Serialization {
            message: e.to_string(),
        }
    }
}
