//! # Form Validation
//!
//! Client-side checks run before any request is sent. Each form validates
//! into the request body the backend expects, normalizing as it goes
//! (trimmed text, lowercased emails).
//!
//! The checks run in a fixed order and stop at the first failure, so the
//! user always sees one message at a time.

use crate::catalog::{Category, ProductDraft, Unit};
use crate::order::{DeliveryAddress, PaymentMethod, PlaceOrderRequest};
use crate::password::{PasswordStrengthResult, password_length, score};
use crate::primitives::{MIN_PASSWORD_LENGTH, RESET_CODE_LENGTH};
use crate::types::{MarketError, Role};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// =============================================================================
// REGISTRATION
// =============================================================================

/// Raw registration input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "rol")]
    pub role: Role,
    #[serde(rename = "telefono")]
    pub phone: String,
}

impl RegistrationForm {
    /// Live strength of the password field.
    #[must_use]
    pub fn password_strength(&self) -> PasswordStrengthResult {
        score(&self.password)
    }

    /// Whether the submit action is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.password_strength().is_strong
    }

    pub fn validate(&self) -> Result<RegisterRequest, MarketError> {
        if is_blank(&self.name)
            || is_blank(&self.email)
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(MarketError::MissingFields(
                "Por favor completa todos los campos obligatorios",
            ));
        }
        if self.password != self.confirm_password {
            return Err(MarketError::PasswordMismatch);
        }
        let strength = self.password_strength();
        if !strength.is_strong {
            return Err(MarketError::WeakPassword(strength.criteria.unmet()));
        }

        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password.clone(),
            role: self.role,
            phone: self.phone.trim().to_string(),
        })
    }
}

// =============================================================================
// LOGIN
// =============================================================================

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Validate login input.
pub fn validate_login(email: &str, password: &str) -> Result<LoginRequest, MarketError> {
    if is_blank(email) || password.is_empty() {
        return Err(MarketError::MissingFields(
            "Por favor completa todos los campos",
        ));
    }
    Ok(LoginRequest {
        email: normalize_email(email),
        password: password.to_string(),
    })
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

/// Body of `POST /auth/forgot-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

/// Step one: the email that receives the code.
pub fn validate_forgot_email(email: &str) -> Result<ForgotPasswordRequest, MarketError> {
    if is_blank(email) {
        return Err(MarketError::MissingFields("Por favor ingresa tu email"));
    }
    Ok(ForgotPasswordRequest {
        email: normalize_email(email),
    })
}

/// Step two: the mailed code, exactly six characters.
pub fn validate_reset_code(code: &str) -> Result<String, MarketError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(MarketError::MissingFields("Por favor ingresa el código"));
    }
    if code.chars().count() != RESET_CODE_LENGTH {
        return Err(MarketError::InvalidResetCode);
    }
    Ok(code.to_string())
}

/// Steps two and three together: code plus the new password.
#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<ResetPasswordRequest, MarketError> {
        let reset_token = validate_reset_code(&self.code)?;
        if self.new_password.is_empty() || self.confirm_password.is_empty() {
            return Err(MarketError::MissingFields(
                "Por favor completa todos los campos",
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(MarketError::PasswordMismatch);
        }
        if password_length(&self.new_password) < MIN_PASSWORD_LENGTH {
            return Err(MarketError::PasswordTooShort);
        }
        Ok(ResetPasswordRequest {
            reset_token,
            new_password: self.new_password.clone(),
        })
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Raw product editor input. Numbers arrive as text.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub unit: Unit,
    pub category: Category,
}

impl ProductForm {
    pub fn validate(&self) -> Result<ProductDraft, MarketError> {
        if is_blank(&self.name) || is_blank(&self.price) || is_blank(&self.stock) {
            return Err(MarketError::MissingFields(
                "Por favor completa todos los campos obligatorios",
            ));
        }
        if is_blank(&self.description) {
            return Err(MarketError::MissingFields("La descripción es requerida"));
        }
        let price = positive_number(&self.price, "El precio")?;
        let stock = positive_number(&self.stock, "La cantidad")?;

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            stock,
            unit: self.unit.clone(),
            category: self.category.clone(),
        })
    }
}

fn positive_number(raw: &str, field: &'static str) -> Result<f64, MarketError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(MarketError::NotPositive { field }),
    }
}

// =============================================================================
// CHECKOUT
// =============================================================================

/// Raw checkout input.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

impl CheckoutForm {
    pub fn validate(&self) -> Result<PlaceOrderRequest, MarketError> {
        let required = [
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.phone,
        ];
        if required.iter().any(|f| is_blank(f)) {
            return Err(MarketError::MissingFields(
                "Completa todos los campos de dirección y teléfono",
            ));
        }
        Ok(PlaceOrderRequest {
            delivery_address: DeliveryAddress {
                street: self.street.trim().to_string(),
                city: self.city.trim().to_string(),
                region: self.region.trim().to_string(),
                postal_code: self.postal_code.trim().to_string(),
                phone: self.phone.trim().to_string(),
            },
            payment_method: self.payment_method,
            notes: self.notes.trim().to_string(),
        })
    }
}

// =============================================================================
// PROFILE
// =============================================================================

/// Body of `POST /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
}

impl ProfileUpdate {
    /// Validate and normalize in place of the raw input.
    pub fn validate(self) -> Result<Self, MarketError> {
        if is_blank(&self.name) || is_blank(&self.email) {
            return Err(MarketError::MissingFields(
                "El nombre y email son requeridos",
            ));
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(MarketError::InvalidEmail);
        }
        Ok(Self {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
        })
    }
}

/// `local@domain.tld` shape: one `@`, no whitespace, a dot inside the domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// =============================================================================
// HELPERS
// =============================================================================

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// TESTS
// =============================================================================
