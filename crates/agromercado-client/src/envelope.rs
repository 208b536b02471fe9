//! The `{ success, data, message }` wrapper every backend response uses.

use agromercado_core::User;
use serde::Deserialize;

/// Response envelope.
///
/// `success` defaults to `false` so a body missing it is never taken for
/// an accepted request.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Only the message of an envelope, used to read error bodies.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Message from an error body, if it is an envelope with one.
    pub(crate) fn message_of(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }
}

/// `data` of login and register: the token alongside the user fields.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}
