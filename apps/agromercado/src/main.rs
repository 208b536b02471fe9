//! # Agromercado
//!
//! The command-line client for the Agromercado marketplace, connecting
//! farmers (`agricultor`) with buyers (`comprador`).
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                apps/agromercado (THE BINARY)              │
//! │                                                           │
//! │   ┌────────────┐   ┌──────────────┐   ┌───────────────┐   │
//! │   │    CLI     │   │    Config    │   │ Session file  │   │
//! │   │   (clap)   │   │ (toml + env) │   │    (JSON)     │   │
//! │   └─────┬──────┘   └──────┬───────┘   └───────┬───────┘   │
//! │         └─────────────────┼───────────────────┘           │
//! │                 ┌─────────┴──────────┐                    │
//! │                 ▼                    ▼                    │
//! │        ┌─────────────────┐  ┌────────────────────┐        │
//! │        │ agromercado-core│  │ agromercado-client │        │
//! │        │   (THE RULES)   │  │     (THE WIRE)     │        │
//! │        └─────────────────┘  └────────────────────┘        │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! agromercado password check 'Rancho#2024'
//! agromercado --api-url http://192.168.100.11:5000/api auth login -e rosa@campo.mx -p 'Rancho#2024'
//! agromercado orders received --status pendiente
//! agromercado orders set-status 665f1c2e confirmado
//! ```

use agromercado::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // AGROMERCADO_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("AGROMERCADO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "agromercado=debug,agromercado_client=debug"
    } else {
        "agromercado=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!(error = %e, "{}", e.user_message());
        if let Some(hint) = e.hint() {
            tracing::warn!("{hint}");
        }
        std::process::exit(1);
    }
}
