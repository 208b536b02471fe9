//! Cart endpoints. The cart lives on the server, one per buyer.

use crate::client::MarketClient;
use crate::error::Result;
use agromercado_core::{AddToCartRequest, Cart, CartItemId, QuantityChange, UpdateCartItemRequest};
use reqwest::Method;

impl MarketClient {
    /// GET /cart. A buyer without a cart gets an empty one.
    pub async fn get_cart(&self, token: &str) -> Result<Cart> {
        let req = self.request(Method::GET, "/cart", Some(token));
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }

    /// POST /cart/add.
    pub async fn add_to_cart(&self, token: &str, item: &AddToCartRequest) -> Result<Option<Cart>> {
        let req = self
            .request(Method::POST, "/cart/add", Some(token))
            .json(item);
        self.fetch_optional(req).await
    }

    /// PUT /cart/update.
    pub async fn update_cart_item(
        &self,
        token: &str,
        update: &UpdateCartItemRequest,
    ) -> Result<Option<Cart>> {
        let req = self
            .request(Method::PUT, "/cart/update", Some(token))
            .json(update);
        self.fetch_optional(req).await
    }

    /// DELETE /cart/remove/{itemId}.
    pub async fn remove_cart_item(&self, token: &str, item: &CartItemId) -> Result<Option<Cart>> {
        let path = format!("/cart/remove/{item}");
        let req = self.request(Method::DELETE, &path, Some(token));
        self.fetch_optional(req).await
    }

    /// DELETE /cart/clear.
    pub async fn clear_cart(&self, token: &str) -> Result<Option<String>> {
        let req = self.request(Method::DELETE, "/cart/clear", Some(token));
        self.execute(req).await
    }

    /// Apply a quantity stepper change: update the line, or remove it at zero.
    pub async fn apply_quantity_change(
        &self,
        token: &str,
        change: &QuantityChange,
    ) -> Result<Option<Cart>> {
        match change {
            QuantityChange::Update(update) => self.update_cart_item(token, update).await,
            QuantityChange::Remove(item) => self.remove_cart_item(token, item).await,
        }
    }
}
