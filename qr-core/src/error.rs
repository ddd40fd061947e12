//! Error types for the qualitative reasoning engine.

use thiserror::Error;

/// Main error type for QR engine operations.
#[derive(Error, Debug)]
pub enum QrError {
    /// Unknown relation type, reference to an undeclared quantity/entity,
    /// or a malformed model/start/target document. Fails fast at load
    /// time; the solver never starts on a `ConfigError`.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The start or target state is not a member of the admissible set, or
    /// `start == target` at A* entry.
    #[error("domain error: {0}")]
    DomainError(String),

    /// An edge whose endpoints were supposed to be admissible states is
    /// missing one — this indicates a bug in the transition generator,
    /// not a bad input.
    #[error("internal invariant violation: {0}")]
    Internal(String),

    /// IO error encountered while loading a model/start/target document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for QR engine operations.
pub type Result<T> = std::result::Result<T, QrError>;