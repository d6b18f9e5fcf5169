//! Error types for butterfly-narrate
//!
//! "No route found" is not an error: it is a status inside the rendered
//! document. The variants below only cover I/O around the renderers and
//! malformed client input such as hint tokens.

use thiserror::Error;

/// Main error type for butterfly-narrate operations
#[derive(Debug, Error)]
pub enum NarrateError {
    /// File I/O error while loading a snapshot or route
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed, or a document could not be rendered
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A hint token was not valid URL-safe base64 or did not decode to a phantom node
    #[error("Invalid hint token '{token}': {reason}")]
    InvalidHint { token: String, reason: String },

    /// Output format name not recognized
    #[error("Unknown output format '{0}' (expected json, length or wayids)")]
    UnknownFormat(String),

    /// Binary serialization of a phantom node failed
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),
}

/// Convenience result type for butterfly-narrate operations
pub type Result<T> = std::result::Result<T, NarrateError>;
