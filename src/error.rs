//! Error types returned by the client.

use thiserror::Error;

/// Message used when an error response carries no readable `message` field.
pub const NO_MESSAGE: &str = "<no message>";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Credential exchange or token refresh failed. Never retried.
    #[error("Failed to authenticate{}", detail(.message))]
    Authentication { message: String },

    /// The server answered with a status other than 200.
    #[error("HTTP {status_code}: {message}")]
    Server { message: String, status_code: u16 },

    /// Connection refused, timeout, invalid URL and other transport failures.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response whose body is not valid JSON.
    #[error("Invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A successful response whose JSON does not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The model type rejected a serialized network.
    #[error("Model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

fn detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl ClientError {
    pub fn authentication(message: impl Into<String>) -> Self {
        ClientError::Authentication {
            message: message.into(),
        }
    }

    /// HTTP status carried by a [`ClientError::Server`] error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Server { status_code, .. } => Some(*status_code),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
