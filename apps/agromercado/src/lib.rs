//! # agromercado
//!
//! Command-line client for the Agromercado marketplace.
//!
//! The binary in `main.rs` only sets up logging and calls [`cli::execute`];
//! everything else lives here so the integration tests can drive it.

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod store;

pub use error::AppError;
pub use store::FileSessionStore;
