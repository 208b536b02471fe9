//! # Order Lifecycle
//!
//! Status vocabulary, transition table and role-driven actions for orders.
//!
//! ## Transition Table
//!
//! ```text
//! pendiente ─► confirmado ─► en_proceso ─► enviado ─► entregado
//!     │            │             │
//!     └────────────┴─────────────┴──────► cancelado
//! ```
//!
//! Any strictly forward move along the main line is legal, so a farmer may
//! skip intermediate steps. `entregado` and `cancelado` are terminal.
//! Illegal moves are rejected before a request is sent.

use crate::primitives::UNKNOWN_STATUS_COLOR;
use crate::types::{MarketError, OrderId, Role, UserSummary};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// STATUS
// =============================================================================

/// Status of an order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pendiente,
    Confirmado,
    EnProceso,
    Enviado,
    Entregado,
    Cancelado,
    /// A status string outside the known vocabulary.
    Unknown(String),
}

impl OrderStatus {
    /// Every known status in lifecycle order.
    pub const KNOWN: [OrderStatus; 6] = [
        OrderStatus::Pendiente,
        OrderStatus::Confirmado,
        OrderStatus::EnProceso,
        OrderStatus::Enviado,
        OrderStatus::Entregado,
        OrderStatus::Cancelado,
    ];

    /// Wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Confirmado => "confirmado",
            Self::EnProceso => "en_proceso",
            Self::Enviado => "enviado",
            Self::Entregado => "entregado",
            Self::Cancelado => "cancelado",
            Self::Unknown(s) => s,
        }
    }

    /// Badge text: uppercase, first underscore turned into a space.
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().to_uppercase().replacen('_', " ", 1)
    }

    /// Badge color.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Pendiente => "#FFA726",
            Self::Confirmado => "#42A5F5",
            Self::EnProceso => "#AB47BC",
            Self::Enviado => "#26C6DA",
            Self::Entregado => "#66BB6A",
            Self::Cancelado => "#EF5350",
            Self::Unknown(_) => UNKNOWN_STATUS_COLOR,
        }
    }

    /// Position on the fulfilment line. `None` for cancelled and unknown.
    const fn rank(&self) -> Option<u8> {
        match self {
            Self::Pendiente => Some(0),
            Self::Confirmado => Some(1),
            Self::EnProceso => Some(2),
            Self::Enviado => Some(3),
            Self::Entregado => Some(4),
            Self::Cancelado | Self::Unknown(_) => None,
        }
    }

    /// No further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregado | Self::Cancelado)
    }

    /// Whether the transition table allows `self -> to`.
    #[must_use]
    pub fn can_transition_to(&self, to: &OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), to) {
            (Some(from), Self::Cancelado) => from <= 2,
            (Some(from), _) => to.rank().is_some_and(|t| t > from),
            (None, _) => false,
        }
    }

    /// Legal targets from this status, in lifecycle order.
    #[must_use]
    pub fn next_statuses(&self) -> Vec<OrderStatus> {
        Self::KNOWN
            .into_iter()
            .filter(|to| self.can_transition_to(to))
            .collect()
    }

    /// Check a transition against the table.
    pub fn ensure_transition(&self, to: &OrderStatus) -> Result<(), MarketError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(MarketError::IllegalTransition {
                from: self.clone(),
                to: to.clone(),
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "pendiente" => Self::Pendiente,
            "confirmado" => Self::Confirmado,
            "en_proceso" => Self::EnProceso,
            "enviado" => Self::Enviado,
            "entregado" => Self::Entregado,
            "cancelado" => Self::Cancelado,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = MarketError;

    /// Strict parse for user input: unknown statuses are an error here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match OrderStatus::from(s.trim()) {
            Self::Unknown(value) => Err(MarketError::UnknownValue {
                kind: "estado",
                value,
            }),
            known => Ok(known),
        }
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrderStatus::from(raw.as_str()))
    }
}

// =============================================================================
// ROLE-DRIVEN ACTIONS
// =============================================================================

/// An action offered on the order detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Farmer moves the order forward.
    Advance(OrderStatus),
    /// Buyer cancels a pending order.
    Cancel,
}

impl OrderAction {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Advance(OrderStatus::Confirmado) => "Confirmar pedido",
            Self::Advance(OrderStatus::EnProceso) => "Marcar en proceso",
            Self::Advance(OrderStatus::Enviado) => "Marcar como enviado",
            Self::Advance(OrderStatus::Entregado) => "Marcar como entregado",
            Self::Advance(_) => "Cambiar estado",
            Self::Cancel => "Cancelar pedido",
        }
    }
}

/// Actions `role` may take on an order in `status`.
///
/// Farmers get the forward moves; cancellation belongs to the buyer and is
/// only offered while the order is still pending.
#[must_use]
pub fn available_actions(role: Role, status: &OrderStatus) -> Vec<OrderAction> {
    match role {
        Role::Agricultor => status
            .next_statuses()
            .into_iter()
            .filter(|s| *s != OrderStatus::Cancelado)
            .map(OrderAction::Advance)
            .collect(),
        Role::Comprador if *status == OrderStatus::Pendiente => vec![OrderAction::Cancel],
        Role::Comprador => Vec::new(),
    }
}

/// Check that `role` may move an order from `from` to `to` through the
/// status endpoint.
pub fn authorize_status_change(
    role: Role,
    from: &OrderStatus,
    to: &OrderStatus,
) -> Result<(), MarketError> {
    if role != Role::Agricultor || *to == OrderStatus::Cancelado {
        return Err(MarketError::ActionNotAllowed {
            role,
            status: from.clone(),
        });
    }
    from.ensure_transition(to)
}

/// Check that `role` may cancel an order in `status`.
pub fn authorize_cancel(role: Role, status: &OrderStatus) -> Result<(), MarketError> {
    if role == Role::Comprador && *status == OrderStatus::Pendiente {
        Ok(())
    } else {
        Err(MarketError::ActionNotAllowed {
            role,
            status: status.clone(),
        })
    }
}

// =============================================================================
// STATUS FILTER
// =============================================================================

/// Filter applied to the farmer's received-orders list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => order.status == *status,
        }
    }

    /// Keep the orders that pass the filter.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [Order]) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

impl FromStr for StatusFilter {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "todos" {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

// =============================================================================
// ORDER RECORDS
// =============================================================================

/// How the buyer pays on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Efectivo,
    Transferencia,
    Tarjeta,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efectivo => "efectivo",
            Self::Transferencia => "transferencia",
            Self::Tarjeta => "tarjeta",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" => Ok(Self::Efectivo),
            "transferencia" => Ok(Self::Transferencia),
            "tarjeta" => Ok(Self::Tarjeta),
            other => Err(MarketError::UnknownValue {
                kind: "método de pago",
                value: other.to_string(),
            }),
        }
    }
}

/// Where an order is delivered.
///
/// `region` is the state/province, not the order status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryAddress {
    #[serde(rename = "calle")]
    pub street: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "estado")]
    pub region: String,
    #[serde(rename = "codigoPostal")]
    pub postal_code: String,
    #[serde(rename = "telefono")]
    pub phone: String,
}

/// Body of `POST /orders`. The backend builds the order from the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(rename = "direccionEntrega")]
    pub delivery_address: DeliveryAddress,
    #[serde(rename = "metodoPago")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "notas")]
    pub notes: String,
}

/// One product line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cantidad")]
    pub quantity: f64,
    #[serde(default)]
    pub subtotal: f64,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(rename = "comprador", default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<UserSummary>,
    #[serde(rename = "direccionEntrega", default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(rename = "metodoPago", default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "fechaPedido", default, skip_serializing_if = "Option::is_none")]
    pub ordered_at: Option<String>,
}

impl Order {
    /// Date shown in lists: creation timestamp, else the order date.
    #[must_use]
    pub fn placed_on(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .or(self.ordered_at.as_deref())
            .map(|ts| ts.split('T').next().unwrap_or(ts))
    }

    /// Actions `role` may take on this order.
    #[must_use]
    pub fn actions_for(&self, role: Role) -> Vec<OrderAction> {
        available_actions(role, &self.status)
    }
}

/// Dashboard figures for a farmer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmerStats {
    #[serde(rename = "totalProductos")]
    pub total_products: u64,
    #[serde(rename = "ordenesPendientes")]
    pub pending_orders: u64,
    #[serde(rename = "totalVentas")]
    pub total_sales: f64,
    #[serde(rename = "totalOrdenes")]
    pub total_orders: u64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_are_legal() {
        for (i, from) in OrderStatus::KNOWN[..5].iter().enumerate() {
            for to in &OrderStatus::KNOWN[i + 1..5] {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn backward_and_self_moves_are_illegal() {
        assert!(!OrderStatus::Enviado.can_transition_to(&OrderStatus::Confirmado));
        assert!(!OrderStatus::Pendiente.can_transition_to(&OrderStatus::Pendiente));
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        assert!(OrderStatus::Entregado.next_statuses().is_empty());
        assert!(OrderStatus::Cancelado.next_statuses().is_empty());
        let err = OrderStatus::Entregado
            .ensure_transition(&OrderStatus::Pendiente)
            .expect_err("delivered orders cannot reopen");
        assert_eq!(
            err,
            MarketError::IllegalTransition {
                from: OrderStatus::Entregado,
                to: OrderStatus::Pendiente
            }
        );
    }

    #[test]
    fn cancellation_only_before_shipping() {
        assert!(OrderStatus::Pendiente.can_transition_to(&OrderStatus::Cancelado));
        assert!(OrderStatus::EnProceso.can_transition_to(&OrderStatus::Cancelado));
        assert!(!OrderStatus::Enviado.can_transition_to(&OrderStatus::Cancelado));
    }

    #[test]
    fn unknown_status_is_preserved_and_frozen() {
        let status: OrderStatus = serde_json::from_str("\"devuelto\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Unknown("devuelto".into()));
        assert_eq!(status.color(), "#757575");
        assert!(status.next_statuses().is_empty());
        assert!("devuelto".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn labels_replace_first_underscore() {
        assert_eq!(OrderStatus::EnProceso.label(), "EN PROCESO");
        assert_eq!(OrderStatus::Pendiente.label(), "PENDIENTE");
    }

    #[test]
    fn farmer_menu_offers_forward_targets_only() {
        let actions = available_actions(Role::Agricultor, &OrderStatus::Confirmado);
        assert_eq!(
            actions,
            vec![
                OrderAction::Advance(OrderStatus::EnProceso),
                OrderAction::Advance(OrderStatus::Enviado),
                OrderAction::Advance(OrderStatus::Entregado),
            ]
        );
        assert!(available_actions(Role::Agricultor, &OrderStatus::Entregado).is_empty());
        assert!(available_actions(Role::Agricultor, &OrderStatus::Cancelado).is_empty());
    }

    #[test]
    fn buyer_can_cancel_only_pending() {
        assert_eq!(
            available_actions(Role::Comprador, &OrderStatus::Pendiente),
            vec![OrderAction::Cancel]
        );
        assert!(available_actions(Role::Comprador, &OrderStatus::Confirmado).is_empty());
        assert!(authorize_cancel(Role::Comprador, &OrderStatus::Pendiente).is_ok());
        assert!(authorize_cancel(Role::Comprador, &OrderStatus::Enviado).is_err());
        assert!(authorize_cancel(Role::Agricultor, &OrderStatus::Pendiente).is_err());
    }

    #[test]
    fn status_change_requires_farmer() {
        assert!(
            authorize_status_change(
                Role::Agricultor,
                &OrderStatus::Pendiente,
                &OrderStatus::Confirmado
            )
            .is_ok()
        );
        assert!(matches!(
            authorize_status_change(
                Role::Comprador,
                &OrderStatus::Pendiente,
                &OrderStatus::Confirmado
            ),
            Err(MarketError::ActionNotAllowed { .. })
        ));
        assert!(matches!(
            authorize_status_change(
                Role::Agricultor,
                &OrderStatus::Pendiente,
                &OrderStatus::Cancelado
            ),
            Err(MarketError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn order_reads_backend_payload() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "estado": "en_proceso",
            "items": [{"nombre": "Tomate", "cantidad": 2, "subtotal": 30.5}],
            "total": 30.5,
            "comprador": {"nombre": "Ana", "telefono": "555"},
            "direccionEntrega": {
                "calle": "Av. 1", "ciudad": "Guadalajara", "estado": "Jalisco",
                "codigoPostal": "44100", "telefono": "555"
            },
            "fechaPedido": "2024-05-02T10:00:00.000Z"
        }))
        .expect("deserialize");
        assert_eq!(order.status, OrderStatus::EnProceso);
        assert_eq!(order.items[0].name, "Tomate");
        assert_eq!(order.placed_on(), Some("2024-05-02"));
        assert_eq!(
            order.delivery_address.as_ref().map(|a| a.region.as_str()),
            Some("Jalisco")
        );
    }

    #[test]
    fn status_filter_parses_todos() {
        assert_eq!("todos".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "enviado".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(OrderStatus::Enviado))
        );
        assert!("x".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn stats_default_missing_fields() {
        let stats: FarmerStats =
            serde_json::from_value(serde_json::json!({"totalVentas": 120.5, "totalOrdenes": 3}))
                .expect("deserialize");
        assert_eq!(stats.pending_orders, 0);
        assert_eq!(stats.total_orders, 3);
    }

    #[test]
    fn place_order_body_uses_backend_keys() {
        let body = PlaceOrderRequest {
            delivery_address: DeliveryAddress::default(),
            payment_method: PaymentMethod::Efectivo,
            notes: String::new(),
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["metodoPago"], "efectivo");
        assert!(json["direccionEntrega"].get("codigoPostal").is_some());
        assert_eq!(json["notas"], "");
    }
}
