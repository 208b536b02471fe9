//! # Fixed Rules
//!
//! Compiled-in constants shared by the scorer, the validators and the
//! order flow. None of these are configurable at runtime.

/// Minimum number of characters for the `length` password criterion.
///
/// Counted in UTF-16 code units, not bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Strength at which a password is considered strong enough to register.
pub const STRONG_THRESHOLD: u8 = 4;

/// Number of password criteria. Upper bound of the strength score.
pub const CRITERIA_COUNT: u8 = 5;

/// Characters that satisfy the `special` password criterion.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Length of the code mailed by the forgot-password flow.
pub const RESET_CODE_LENGTH: usize = 6;

/// Badge color used for order statuses outside the known vocabulary.
pub const UNKNOWN_STATUS_COLOR: &str = "#757575";

/// Fallback shown when a request fails without any server or transport message.
pub const CONNECTION_FALLBACK_MESSAGE: &str =
    "No se pudo conectar con el servidor. Verifica tu conexión.";
