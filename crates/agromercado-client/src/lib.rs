//! # agromercado-client
//!
//! Async client for the Agromercado REST backend.
//!
//! [`MarketClient`] covers authentication, the catalog, the cart, orders and
//! the farmer dashboard. Request and response bodies are the records of
//! [`agromercado_core`]; every response is unwrapped from the backend's
//! `{ success, data, message }` envelope.
//!
//! ```no_run
//! use agromercado_client::{ClientConfig, MarketClient};
//! use agromercado_core::forms::validate_login;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MarketClient::new(&ClientConfig::new("http://localhost:5000/api"))?;
//! let credentials = validate_login("rosa@campo.mx", "Rancho#2024")?;
//! let (token, user) = client.login(&credentials).await?;
//! let orders = client.received_orders(&token).await?;
//! println!("{} has {} orders", user.name, orders.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// MODULES
// =============================================================================

mod auth;
mod cart;
mod catalog;
mod client;
pub mod config;
pub mod envelope;
pub mod error;
mod orders;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use client::MarketClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use envelope::{ApiEnvelope, AuthPayload};
pub use error::{ClientError, Result};
