//! Order endpoints and the farmer dashboard.

use crate::client::MarketClient;
use crate::error::Result;
use agromercado_core::{FarmerStats, Order, OrderId, OrderStatus, PlaceOrderRequest};
use reqwest::Method;
use serde_json::json;

impl MarketClient {
    /// POST /orders: turn the buyer's cart into an order.
    pub async fn place_order(&self, token: &str, order: &PlaceOrderRequest) -> Result<Option<Order>> {
        let req = self
            .request(Method::POST, "/orders", Some(token))
            .json(order);
        self.fetch_optional(req).await
    }

    /// GET /orders/mis-pedidos: orders placed by the signed-in buyer.
    pub async fn my_orders(&self, token: &str) -> Result<Vec<Order>> {
        let req = self.request(Method::GET, "/orders/mis-pedidos", Some(token));
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }

    /// GET /orders/agricultor: orders containing the farmer's products.
    pub async fn received_orders(&self, token: &str) -> Result<Vec<Order>> {
        let req = self.request(Method::GET, "/orders/agricultor", Some(token));
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }

    /// PUT /orders/{id}/status with `{ "estado": status }`.
    ///
    /// Does not check the transition table; callers authorize first.
    pub async fn update_order_status(
        &self,
        token: &str,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<Option<Order>> {
        let path = format!("/orders/{id}/status");
        let req = self
            .request(Method::PUT, &path, Some(token))
            .json(&json!({ "estado": status }));
        self.fetch_optional(req).await
    }

    /// PUT /orders/{id}/cancel.
    pub async fn cancel_order(&self, token: &str, id: &OrderId) -> Result<Option<Order>> {
        let path = format!("/orders/{id}/cancel");
        let req = self
            .request(Method::PUT, &path, Some(token))
            .json(&json!({}));
        self.fetch_optional(req).await
    }

    /// GET /orders/agricultor/stats.
    pub async fn farmer_stats(&self, token: &str) -> Result<FarmerStats> {
        let req = self.request(Method::GET, "/orders/agricultor/stats", Some(token));
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }
}
