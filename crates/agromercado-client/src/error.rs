//! Error types for the marketplace client.

use agromercado_core::primitives::CONNECTION_FALLBACK_MESSAGE;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend could not be reached, or the request timed out.
    #[error("Cannot connect to {url}: {reason}")]
    Connection { url: String, reason: String },

    /// 401 Unauthorized: missing, expired or invalid token.
    #[error("Unauthorized{}", suffix(.message))]
    Unauthorized { message: Option<String> },

    /// Non-2xx response.
    #[error("Server returned {status}{}", suffix(.message))]
    Api { status: u16, message: Option<String> },

    /// 2xx response whose envelope reports `success: false`.
    #[error("Request rejected{}", suffix(.0))]
    Rejected(Option<String>),

    /// Successful envelope without the expected `data`.
    #[error("Response has no data")]
    MissingData,

    /// The body is not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The client cannot be built from its configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Text to show the end user.
    ///
    /// Prefers the server's own message, then the transport failure, then a
    /// generic connectivity hint.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message: Some(m) }
            | Self::Api {
                message: Some(m), ..
            }
            | Self::Rejected(Some(m)) => m.clone(),
            Self::Connection { reason, .. } if !reason.is_empty() => reason.clone(),
            Self::Unauthorized { message: None } => "Sesión expirada o inválida".to_string(),
            Self::Api {
                status,
                message: None,
            } => format!("Error del servidor ({status})"),
            _ => CONNECTION_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Whether signing in again could fix the failure.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
