//! # Core Type Definitions
//!
//! Shared marketplace types:
//! - Backend identifiers (`UserId`, `ProductId`, `CartItemId`, `OrderId`)
//! - Account types (`Role`, `User`)
//! - Error type (`MarketError`)
//!
//! Identifiers are opaque strings issued by the backend (`_id` keys).
//! Error messages are the Spanish texts shown to the end user.

use crate::order::OrderStatus;
use crate::password::Criterion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

backend_id!(
    /// Identifier of a registered user.
    UserId
);
backend_id!(
    /// Identifier of a catalog product.
    ProductId
);
backend_id!(
    /// Identifier of a line in the buyer's cart (not the product).
    CartItemId
);
backend_id!(
    /// Identifier of a placed order.
    OrderId
);

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Account role, chosen at registration and fixed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Farmer: publishes products and fulfils orders.
    Agricultor,
    /// Buyer: browses the catalog, fills a cart and places orders.
    #[default]
    Comprador,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agricultor => "agricultor",
            Self::Comprador => "comprador",
        }
    }

    /// Theme color associated with the role.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Agricultor => "#4CAF50",
            Self::Comprador => "#2196F3",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agricultor" => Ok(Self::Agricultor),
            "comprador" => Ok(Self::Comprador),
            other => Err(MarketError::UnknownValue {
                kind: "rol",
                value: other.to_string(),
            }),
        }
    }
}

/// A user profile as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "ubicacion", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Counterparty summary embedded in orders and products.
///
/// The backend populates only some fields depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by client-side rules before anything is sent to the backend.
///
/// Display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// One or more required fields are blank. Carries the message to show.
    #[error("{0}")]
    MissingFields(&'static str),

    #[error("Las contraseñas no coinciden")]
    PasswordMismatch,

    /// The password does not reach the strength gate.
    #[error("La contraseña no es suficientemente segura. Falta: {}", join_criteria(.0))]
    WeakPassword(Vec<Criterion>),

    #[error("La contraseña debe tener al menos 8 caracteres")]
    PasswordTooShort,

    #[error("Por favor ingresa un email válido")]
    InvalidEmail,

    #[error("El código debe tener 6 dígitos")]
    InvalidResetCode,

    /// A numeric field is not a number or not strictly positive.
    #[error("{field} debe ser un número mayor a 0")]
    NotPositive { field: &'static str },

    /// The order cannot move between these statuses.
    #[error("No se puede cambiar un pedido de {from} a {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The role may not act on an order in this status.
    #[error("Un {role} no puede realizar esta acción en un pedido {status}")]
    ActionNotAllowed { role: Role, status: OrderStatus },

    #[error("Debes iniciar sesión para continuar")]
    NotAuthenticated,

    /// The product has no stock to add to a cart.
    #[error("{0} no tiene existencias disponibles")]
    OutOfStock(String),

    /// A textual value does not belong to a fixed vocabulary.
    #[error("Valor desconocido para {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

fn join_criteria(criteria: &[Criterion]) -> String {
    criteria
        .iter()
        .map(|c| c.label().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_names() {
        assert_eq!("agricultor".parse::<Role>(), Ok(Role::Agricultor));
        assert_eq!(" Comprador ".parse::<Role>(), Ok(Role::Comprador));
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(
            serde_json::to_string(&Role::Agricultor).expect("serialize"),
            "\"agricultor\""
        );
    }

    #[test]
    fn user_reads_backend_keys() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "nombre": "Juan Pérez",
            "email": "juan@example.com",
            "rol": "agricultor",
            "telefono": "3331234567",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .expect("deserialize");
        assert_eq!(user.id, UserId::new("u1"));
        assert_eq!(user.role, Role::Agricultor);
        assert_eq!(user.phone.as_deref(), Some("3331234567"));
        assert_eq!(user.location, None);
    }

    #[test]
    fn weak_password_message_lists_missing_criteria() {
        let err = MarketError::WeakPassword(vec![Criterion::Number, Criterion::Special]);
        assert_eq!(
            err.to_string(),
            "La contraseña no es suficientemente segura. Falta: un número, un carácter especial"
        );
    }

    #[test]
    fn identifiers_serialize_transparently() {
        let id = OrderId::new("abc123");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"abc123\"");
        assert_eq!(id.to_string(), "abc123");
    }
}
