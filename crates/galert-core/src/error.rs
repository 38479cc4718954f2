//! Error types for the galert controller

use thiserror::Error;

/// Result type alias using the controller's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for controller operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error talking to Grafana
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Grafana answered with a non-success status
    #[error("Grafana API error ({status}): {message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Response body text, if any
        message: String,
    },

    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Grafana API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
