//! # Password Strength
//!
//! Scores a candidate password against five independent criteria and maps
//! the count of satisfied criteria onto a fixed set of display bands.
//!
//! The scorer is a total function: every string, including the empty one,
//! produces a result. It is recomputed on every keystroke by the
//! registration flow, which renders:
//! - a bar filled to [`PasswordStrengthResult::bar_percent`] in
//!   [`PasswordStrengthResult::color`],
//! - one checklist row per [`Criterion`],
//! - a submit action enabled only when [`PasswordStrengthResult::is_strong`].
//!
//! | strength | band        | color   |
//! |----------|-------------|---------|
//! | 0–1      | Muy débil   | #EF5350 |
//! | 2        | Débil       | #FFA726 |
//! | 3        | Normal      | #FFC107 |
//! | 4        | Fuerte      | #66BB6A |
//! | 5        | Muy fuerte  | #2E7D32 |

use crate::primitives::{CRITERIA_COUNT, MIN_PASSWORD_LENGTH, SPECIAL_CHARACTERS, STRONG_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CRITERIA
// =============================================================================

/// Password length as the registration form measures it: UTF-16 code units.
///
/// Characters outside the Basic Multilingual Plane count twice.
#[must_use]
pub fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}

/// One of the five password checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Length,
    Uppercase,
    Lowercase,
    Number,
    Special,
}

impl Criterion {
    /// All criteria in checklist order.
    pub const ALL: [Criterion; 5] = [
        Criterion::Length,
        Criterion::Uppercase,
        Criterion::Lowercase,
        Criterion::Number,
        Criterion::Special,
    ];

    /// Checklist label shown next to the criterion.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Length => "Mínimo 8 caracteres",
            Self::Uppercase => "Una letra mayúscula",
            Self::Lowercase => "Una letra minúscula",
            Self::Number => "Un número",
            Self::Special => "Un carácter especial",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of each criterion for a single password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PasswordCriteria {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordCriteria {
    /// Evaluate every criterion against `password`.
    ///
    /// The checks are independent; none short-circuits another.
    #[must_use]
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password_length(password) >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// Whether a single criterion holds.
    #[must_use]
    pub const fn is_met(&self, criterion: Criterion) -> bool {
        match criterion {
            Criterion::Length => self.length,
            Criterion::Uppercase => self.uppercase,
            Criterion::Lowercase => self.lowercase,
            Criterion::Number => self.number,
            Criterion::Special => self.special,
        }
    }

    /// Number of satisfied criteria (0..=5).
    #[must_use]
    pub fn met_count(&self) -> u8 {
        Criterion::ALL.iter().filter(|c| self.is_met(**c)).count() as u8
    }

    /// Checklist rows in display order.
    #[must_use]
    pub fn checklist(&self) -> [(Criterion, bool); 5] {
        Criterion::ALL.map(|c| (c, self.is_met(c)))
    }

    /// Criteria not yet satisfied, in display order.
    #[must_use]
    pub fn unmet(&self) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|c| !self.is_met(*c))
            .collect()
    }
}

// =============================================================================
// STRENGTH BANDS
// =============================================================================

/// Display band selected by the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Normal,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    /// Band for a strength score. Scores above five saturate.
    #[must_use]
    pub const fn from_score(strength: u8) -> Self {
        match strength {
            0 | 1 => Self::VeryWeak,
            2 => Self::Weak,
            3 => Self::Normal,
            4 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::VeryWeak => "Muy débil",
            Self::Weak => "Débil",
            Self::Normal => "Normal",
            Self::Strong => "Fuerte",
            Self::VeryStrong => "Muy fuerte",
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::VeryWeak => "#EF5350",
            Self::Weak => "#FFA726",
            Self::Normal => "#FFC107",
            Self::Strong => "#66BB6A",
            Self::VeryStrong => "#2E7D32",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// RESULT
// =============================================================================

/// Derived strength of one password value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrengthResult {
    pub criteria: PasswordCriteria,
    pub strength: u8,
    pub is_strong: bool,
    pub message: String,
    pub color: String,
}

impl PasswordStrengthResult {
    /// Filled share of the strength bar, `strength / 5 * 100`.
    #[must_use]
    pub fn bar_percent(&self) -> u8 {
        self.strength.min(CRITERIA_COUNT) * (100 / CRITERIA_COUNT)
    }
}

/// Score a password.
///
/// Total over all inputs, deterministic and free of side effects.
///
/// ```
/// use agromercado_core::password::score;
///
/// let result = score("Aa1!aaaa");
/// assert_eq!(result.strength, 5);
/// assert!(result.is_strong);
/// assert_eq!(result.message, "Muy fuerte");
/// ```
#[must_use]
pub fn score(password: &str) -> PasswordStrengthResult {
    let criteria = PasswordCriteria::evaluate(password);
    let strength = criteria.met_count();
    let band = PasswordStrength::from_score(strength);

    PasswordStrengthResult {
        criteria,
        strength,
        is_strong: strength >= STRONG_THRESHOLD,
        message: band.message().to_string(),
        color: band.color().to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
