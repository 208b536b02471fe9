//! Application-level errors.

use agromercado_client::ClientError;
use agromercado_core::{MarketError, Role};
use thiserror::Error;

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// A client-side rule refused the input.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// The backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The signed-in account has the wrong role for the command.
    #[error("Esta acción requiere una cuenta de {0}")]
    RoleRequired(Role),

    /// A record referenced by id is not visible to the user.
    #[error("{kind} {id} no encontrado")]
    NotFound { kind: &'static str, id: String },

    #[error("Tu carrito está vacío")]
    EmptyCart,
}

impl AppError {
    /// Text to show the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Follow-up to suggest alongside the message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Client(e) if e.is_unauthorized() => {
                Some("Vuelve a iniciar sesión con `agromercado auth login`")
            }
            Self::Market(MarketError::NotAuthenticated) => {
                Some("Inicia sesión con `agromercado auth login`")
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_errors_show_as_is() {
        let err = AppError::from(MarketError::PasswordMismatch);
        assert_eq!(err.user_message(), "Las contraseñas no coinciden");
    }

    #[test]
    fn client_errors_use_their_user_message() {
        let err = AppError::from(ClientError::Rejected(Some("Sin stock".into())));
        assert_eq!(err.user_message(), "Sin stock");
    }

    #[test]
    fn expired_token_suggests_signing_in_again() {
        let err = AppError::from(ClientError::Unauthorized { message: None });
        assert_eq!(
            err.hint(),
            Some("Vuelve a iniciar sesión con `agromercado auth login`")
        );
        assert!(AppError::from(MarketError::NotAuthenticated).hint().is_some());
        assert_eq!(AppError::EmptyCart.hint(), None);
    }

    #[test]
    fn role_required_names_role() {
        assert_eq!(
            AppError::RoleRequired(Role::Agricultor).to_string(),
            "Esta acción requiere una cuenta de agricultor"
        );
    }
}
