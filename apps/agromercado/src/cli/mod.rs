//! # Agromercado CLI Module
//!
//! This module implements the command-line interface of the marketplace.
//!
//! ## Available Commands
//!
//! - `password check` - Score a password against the registration gate
//! - `auth` - Login, registration, logout, password reset
//! - `products` - Browse the catalog and manage a farmer's listings
//! - `cart` - Manage the buyer's cart and check out
//! - `orders` - List orders and drive their status
//! - `stats` - Farmer dashboard figures
//! - `profile update` - Edit the signed-in profile

mod commands;

use crate::config::{FileConfig, Overrides, Settings};
use crate::error::AppError;
use crate::store::FileSessionStore;
use agromercado_client::MarketClient;
use agromercado_core::{
    Category, CategoryFilter, CartItemId, OrderId, OrderStatus, PaymentMethod, ProductId, Role,
    StatusFilter, Unit,
};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Agromercado - marketplace client for farmers and buyers
#[derive(Parser, Debug)]
#[command(name = "agromercado")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file [default: agromercado.toml]
    #[arg(long, global = true, env = "AGROMERCADO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the session file
    #[arg(long, global = true, env = "AGROMERCADO_SESSION")]
    pub session: Option<PathBuf>,

    /// Backend API root, e.g. http://192.168.100.11:5000/api
    #[arg(long, global = true, env = "AGROMERCADO_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "AGROMERCADO_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Password strength tools
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Account and session management
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Product catalog
    #[command(subcommand)]
    Products(ProductsCommand),

    /// Shopping cart (buyers)
    #[command(subcommand)]
    Cart(CartCommand),

    /// Orders
    #[command(subcommand)]
    Orders(OrdersCommand),

    /// Sales dashboard (farmers)
    Stats,

    /// Profile
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
pub enum PasswordCommand {
    /// Score a password without sending it anywhere
    Check {
        password: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and store the session
    Register(RegisterArgs),

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Ask for a password reset code by email
    Forgot {
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password with the emailed code
    Reset {
        #[arg(short, long)]
        code: String,
        #[arg(short, long)]
        password: String,
        /// Repeat the new password [default: same as --password]
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    /// Repeat the password [default: same as --password]
    #[arg(long)]
    pub confirm: Option<String>,
    #[arg(long, default_value = "")]
    pub phone: String,
    /// agricultor or comprador
    #[arg(short, long, default_value = "comprador")]
    pub role: Role,
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// Browse the public catalog
    List {
        /// Category, or "todas"
        #[arg(short, long, default_value = "todas")]
        category: CategoryFilter,
        /// Case-insensitive text matched against name and description
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// List the signed-in farmer's products
    Mine,

    /// Publish a product
    Add(ProductArgs),

    /// Edit one of the farmer's products; omitted fields keep their value
    Edit {
        id: ProductId,
        #[command(flatten)]
        changes: ProductChanges,
    },

    /// Delete one of the farmer's products
    Delete {
        id: ProductId,
    },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub stock: String,
    #[arg(short, long, default_value = "kg")]
    pub unit: Unit,
    #[arg(short, long, default_value = "verduras")]
    pub category: Category,
}

#[derive(Args, Debug, Default)]
pub struct ProductChanges {
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
    #[arg(short, long)]
    pub unit: Option<Unit>,
    #[arg(short, long)]
    pub category: Option<Category>,
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add a product
    Add {
        product: ProductId,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set a line's quantity; below 1 removes it
    Set {
        item: CartItemId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a line
    Remove {
        item: CartItemId,
    },

    /// Empty the cart
    Clear,

    /// Place an order with the cart's contents
    Checkout(CheckoutArgs),
}

#[derive(Args, Debug)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub city: String,
    /// State or province
    #[arg(long)]
    pub region: String,
    #[arg(long)]
    pub postal_code: String,
    #[arg(long)]
    pub phone: String,
    /// efectivo, transferencia or tarjeta
    #[arg(long, default_value = "efectivo")]
    pub payment: PaymentMethod,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    /// Orders placed by the signed-in buyer
    Mine,

    /// Orders received by the signed-in farmer
    Received {
        /// A status, or "todos"
        #[arg(short, long, default_value = "todos")]
        status: StatusFilter,
    },

    /// Show one order and the actions available on it
    Show {
        id: OrderId,
    },

    /// Move an order forward (farmers)
    SetStatus {
        id: OrderId,
        /// confirmado, en_proceso, enviado or entregado
        #[arg(value_parser = OrderStatus::from_str)]
        status: OrderStatus,
    },

    /// Cancel a pending order (buyers)
    Cancel {
        id: OrderId,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Update profile fields; omitted fields keep their value
    Update {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(short, long)]
        location: Option<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// What every command runs against.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: MarketClient,
    pub store: FileSessionStore,
    pub json: bool,
    pub color: bool,
}

impl Context {
    /// Resolve settings and build the client and session store.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let file = FileConfig::load(cli.config.as_deref())?;
        let settings = Settings::resolve(
            file,
            Overrides {
                api_url: cli.api_url.clone(),
                timeout_secs: cli.timeout_secs,
                session_path: cli.session.clone(),
            },
        );
        tracing::debug!(
            api_url = %settings.api_url,
            session = %settings.session_path.display(),
            "settings resolved"
        );

        let color = !cli.json
            && std::io::stdout().is_terminal()
            && std::env::var_os("NO_COLOR").is_none();
        Ok(Self {
            client: MarketClient::new(&settings.client_config())?,
            store: FileSessionStore::new(settings.session_path),
            json: cli.json,
            color,
        })
    }
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        Commands::Password(PasswordCommand::Check { password }) => {
            cmd_password_check(&ctx, &password)
        }
        Commands::Auth(command) => match command {
            AuthCommand::Login { email, password } => cmd_login(&ctx, &email, &password).await,
            AuthCommand::Register(args) => cmd_register(&ctx, args).await,
            AuthCommand::Logout => cmd_logout(&ctx),
            AuthCommand::Whoami => cmd_whoami(&ctx),
            AuthCommand::Forgot { email } => cmd_forgot_password(&ctx, &email).await,
            AuthCommand::Reset {
                code,
                password,
                confirm,
            } => cmd_reset_password(&ctx, &code, &password, confirm.as_deref()).await,
        },
        Commands::Products(command) => match command {
            ProductsCommand::List { category, search } => {
                cmd_products_list(&ctx, category, &search).await
            }
            ProductsCommand::Mine => cmd_products_mine(&ctx).await,
            ProductsCommand::Add(args) => cmd_products_add(&ctx, args).await,
            ProductsCommand::Edit { id, changes } => cmd_products_edit(&ctx, &id, changes).await,
            ProductsCommand::Delete { id } => cmd_products_delete(&ctx, &id).await,
        },
        Commands::Cart(command) => match command {
            CartCommand::Show => cmd_cart_show(&ctx).await,
            CartCommand::Add { product, quantity } => {
                cmd_cart_add(&ctx, &product, quantity).await
            }
            CartCommand::Set { item, quantity } => cmd_cart_set(&ctx, item, quantity).await,
            CartCommand::Remove { item } => cmd_cart_set(&ctx, item, 0).await,
            CartCommand::Clear => cmd_cart_clear(&ctx).await,
            CartCommand::Checkout(args) => cmd_checkout(&ctx, args).await,
        },
        Commands::Orders(command) => match command {
            OrdersCommand::Mine => cmd_orders_mine(&ctx).await,
            OrdersCommand::Received { status } => cmd_orders_received(&ctx, &status).await,
            OrdersCommand::Show { id } => cmd_orders_show(&ctx, &id).await,
            OrdersCommand::SetStatus { id, status } => {
                cmd_orders_set_status(&ctx, &id, &status).await
            }
            OrdersCommand::Cancel { id } => cmd_orders_cancel(&ctx, &id).await,
        },
        Commands::Stats => cmd_stats(&ctx).await,
        Commands::Profile(ProfileCommand::Update {
            name,
            email,
            phone,
            location,
        }) => {
            cmd_profile_update(
                &ctx,
                ProfileChanges {
                    name,
                    email,
                    phone,
                    location,
                },
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "agromercado",
            "orders",
            "set-status",
            "o1",
            "en_proceso",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Orders(OrdersCommand::SetStatus { ref id, ref status })
                if *id == OrderId::new("o1") && *status == OrderStatus::EnProceso
        ));
    }

    #[test]
    fn rejects_unknown_status() {
        let result = Cli::try_parse_from(["agromercado", "orders", "set-status", "o1", "perdido"]);
        assert!(result.is_err());
    }

    #[test]
    fn cart_set_accepts_negative_quantity() {
        let cli = Cli::try_parse_from(["agromercado", "cart", "set", "i1", "-1"]).expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Cart(CartCommand::Set { quantity: -1, .. })
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "agromercado",
            "products",
            "list",
            "--category",
            "frutas",
            "--json",
            "--api-url",
            "http://10.0.0.5:5000/api",
        ])
        .expect("parse");
        assert!(cli.json);
        assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.5:5000/api"));
        assert!(matches!(
            cli.command,
            Commands::Products(ProductsCommand::List {
                category: CategoryFilter::Only(Category::Frutas),
                ..
            })
        ));
    }
}
