//! # agromercado-core
//!
//! The marketplace domain for Agromercado, a client connecting farmers
//! (`agricultor`) with buyers (`comprador`).
//!
//! This crate holds everything that can be decided without the network:
//! - password strength scoring for the registration gate
//! - the order status vocabulary and its transition table
//! - catalog, cart and order records as the backend serializes them
//! - validation of every form before it is submitted
//! - the explicit signed-in [`Session`]
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no logging
//! - Every function is deterministic and side-effect free, except the
//!   in-memory [`MemorySessionStore`]

// =============================================================================
// MODULES
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod forms;
pub mod order;
pub mod password;
pub mod primitives;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{CartItemId, MarketError, OrderId, ProductId, Role, User, UserId, UserSummary};

// =============================================================================
// RE-EXPORTS: Password Strength
// =============================================================================

pub use password::{Criterion, PasswordCriteria, PasswordStrength, PasswordStrengthResult, password_length, score};

// =============================================================================
// RE-EXPORTS: Marketplace Records
// =============================================================================

pub use cart::{AddToCartRequest, Cart, CartItem, QuantityChange, UpdateCartItemRequest};
pub use catalog::{Category, CategoryFilter, Product, ProductDraft, Unit, filter_products};
pub use order::{
    DeliveryAddress, FarmerStats, Order, OrderAction, OrderItem, OrderStatus, PaymentMethod,
    PlaceOrderRequest, StatusFilter, available_actions,
};

// =============================================================================
// RE-EXPORTS: Forms & Session
// =============================================================================

pub use forms::{
    CheckoutForm, ForgotPasswordRequest, LoginRequest, ProductForm, ProfileUpdate,
    RegisterRequest, RegistrationForm, ResetPasswordForm, ResetPasswordRequest,
};
pub use session::{MemorySessionStore, Session, SessionStore};
