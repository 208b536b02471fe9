//! # Cart
//!
//! The buyer's cart as returned by the backend, plus the quantity-change
//! rule of the cart view.

use crate::types::{CartItemId, ProductId};
use serde::{Deserialize, Serialize};

/// Product summary embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartProduct {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    #[serde(rename = "producto", default, skip_serializing_if = "Option::is_none")]
    pub product: Option<CartProduct>,
    /// Units in the line. JSON numbers, possibly fractional for bulk units.
    #[serde(rename = "cantidad")]
    pub quantity: f64,
    /// Unit price captured when the line was added.
    #[serde(rename = "precio")]
    pub price: f64,
}

impl CartItem {
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity
    }

    /// Name shown for the line, `Producto` when the backend omits it.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("Producto")
    }
}

/// The buyer's cart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Total as computed by the backend.
    #[serde(default)]
    pub total: f64,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line subtotals, independent of the backend's `total`.
    #[must_use]
    pub fn computed_total(&self) -> f64 {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Total to show: the backend's, or the line sum when it sent none.
    #[must_use]
    pub fn display_total(&self) -> f64 {
        if self.total.abs() < f64::EPSILON && !self.items.is_empty() {
            self.computed_total()
        } else {
            self.total
        }
    }

    #[must_use]
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == *id)
    }
}

/// Body of `POST /cart/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    #[serde(rename = "productoId")]
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

/// Body of `PUT /cart/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    #[serde(rename = "itemId")]
    pub item_id: CartItemId,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

/// What a quantity change on a cart line turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    Update(UpdateCartItemRequest),
    /// Quantities below one remove the line.
    Remove(CartItemId),
}

impl QuantityChange {
    /// Decide the request for setting `item` to `quantity`.
    #[must_use]
    pub fn for_quantity(item: CartItemId, quantity: i64) -> Self {
        match u32::try_from(quantity) {
            Ok(q) if q >= 1 => Self::Update(UpdateCartItemRequest {
                item_id: item,
                quantity: q,
            }),
            Ok(_) => Self::Remove(item),
            Err(_) if quantity < 1 => Self::Remove(item),
            Err(_) => Self::Update(UpdateCartItemRequest {
                item_id: item,
                quantity: u32::MAX,
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
