//! Product endpoints.

use crate::client::MarketClient;
use crate::error::Result;
use agromercado_core::{Product, ProductDraft, ProductId};
use reqwest::Method;

impl MarketClient {
    /// GET /products: the public catalog.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let req = self.request(Method::GET, "/products", None);
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }

    /// GET /products/agricultor/mis-productos: the signed-in farmer's listings.
    pub async fn my_products(&self, token: &str) -> Result<Vec<Product>> {
        let req = self.request(Method::GET, "/products/agricultor/mis-productos", Some(token));
        Ok(self.fetch_optional(req).await?.unwrap_or_default())
    }

    /// POST /products.
    pub async fn create_product(&self, token: &str, draft: &ProductDraft) -> Result<Option<Product>> {
        let req = self
            .request(Method::POST, "/products", Some(token))
            .json(draft);
        self.fetch_optional(req).await
    }

    /// PUT /products/{id}.
    pub async fn update_product(
        &self,
        token: &str,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>> {
        let path = format!("/products/{id}");
        let req = self.request(Method::PUT, &path, Some(token)).json(draft);
        self.fetch_optional(req).await
    }

    /// DELETE /products/{id}.
    pub async fn delete_product(&self, token: &str, id: &ProductId) -> Result<Option<String>> {
        let path = format!("/products/{id}");
        let req = self.request(Method::DELETE, &path, Some(token));
        self.execute(req).await
    }
}
