//! Error types for the dispatcher and its collaborators
//!
//! The dispatcher itself never creates these; it hands whatever a
//! collaborator returned straight back to its caller.

use thiserror::Error;

/// Result type alias for dispatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type shared by the dispatcher and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Alert consumer failures (rendering, posting or withdrawing alerts)
    #[error("Alert consumer error: {0}")]
    AlertConsumer(String),

    /// Observer registry failures
    #[error("Observer registry error: {0}")]
    ObserverRegistry(String),

    /// A single observer rejected a delivery
    #[error("Delivery to observer {observer} failed: {message}")]
    Delivery {
        /// Observer name
        observer: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (e.g. an identity outside its profile group)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown group, identity or subscription
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an alert consumer error
    pub fn alert_consumer(msg: impl Into<String>) -> Self {
        Self::AlertConsumer(msg.into())
    }

    /// Create an observer registry error
    pub fn observer_registry(msg: impl Into<String>) -> Self {
        Self::ObserverRegistry(msg.into())
    }

    /// Create a delivery error for a named observer
    pub fn delivery(observer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            observer: observer.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
