//! # Catalog
//!
//! Product records, their vocabularies (category, unit) and the
//! buyer-side catalog filter.
//!
//! Listings decode leniently: a category or unit outside the known
//! vocabulary is kept verbatim instead of failing the whole catalog.
//! User input parses strictly through [`FromStr`].

use crate::types::{MarketError, ProductId, UserSummary};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// VOCABULARIES
// =============================================================================

/// Product category. Sent lowercase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Frutas,
    #[default]
    Verduras,
    Granos,
    Lacteos,
    Carnes,
    Otros,
    /// A category string outside the known vocabulary.
    Unknown(String),
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Frutas,
        Category::Verduras,
        Category::Granos,
        Category::Lacteos,
        Category::Carnes,
        Category::Otros,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Frutas => "frutas",
            Self::Verduras => "verduras",
            Self::Granos => "granos",
            Self::Lacteos => "lacteos",
            Self::Carnes => "carnes",
            Self::Otros => "otros",
            Self::Unknown(s) => s,
        }
    }

    /// Display name with the first letter capitalized.
    #[must_use]
    pub fn display_name(&self) -> String {
        capitalize(self.as_str())
    }

    /// Lenient decode of a backend value. Missing or blank means `otros`.
    fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Otros,
            Some(s) => {
                let wanted = s.to_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|c| c.as_str() == wanted)
                    .unwrap_or_else(|| Self::Unknown(s.to_string()))
            }
        }
    }

    fn uncategorized() -> Self {
        Self::Otros
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let found = Self::ALL.into_iter().find(|c| c.as_str() == wanted);
        found.ok_or(MarketError::UnknownValue {
            kind: "categoría",
            value: wanted,
        })
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(raw.as_deref()))
    }
}

/// Unit a product is sold by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Kg,
    Piezas,
    Litros,
    Cajas,
    Toneladas,
    /// A unit string outside the known vocabulary.
    Unknown(String),
}

impl Unit {
    pub const ALL: [Unit; 5] = [
        Unit::Kg,
        Unit::Piezas,
        Unit::Litros,
        Unit::Cajas,
        Unit::Toneladas,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Kg => "kg",
            Self::Piezas => "piezas",
            Self::Litros => "litros",
            Self::Cajas => "cajas",
            Self::Toneladas => "toneladas",
            Self::Unknown(s) => s,
        }
    }

    /// Lenient decode of a backend value. Missing or blank means `kg`.
    fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Kg,
            Some(s) => {
                let wanted = s.to_lowercase();
                Self::ALL
                    .into_iter()
                    .find(|u| u.as_str() == wanted)
                    .unwrap_or_else(|| Self::Unknown(s.to_string()))
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let found = Self::ALL.into_iter().find(|u| u.as_str() == wanted);
        found.ok_or(MarketError::UnknownValue {
            kind: "unidad",
            value: wanted,
        })
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_wire(raw.as_deref()))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio")]
    pub price: f64,
    /// Units in stock.
    #[serde(rename = "cantidad")]
    pub stock: f64,
    #[serde(rename = "unidad", default)]
    pub unit: Unit,
    #[serde(rename = "categoria", default = "Category::uncategorized")]
    pub category: Category,
    #[serde(rename = "agricultor", default, skip_serializing_if = "Option::is_none")]
    pub farmer: Option<UserSummary>,
}

impl Product {
    /// Products without stock cannot be added to a cart.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.stock > 0.0
    }

    /// Check the product can be added to a cart.
    pub fn ensure_available(&self) -> Result<(), MarketError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(MarketError::OutOfStock(self.name.clone()))
        }
    }

    /// Rebuild the editable form of this product.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            price: self.price,
            stock: self.stock,
            unit: self.unit.clone(),
            category: self.category.clone(),
        }
    }
}

/// Body of product create and update requests.
///
/// Built by [`crate::forms::ProductForm::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "cantidad")]
    pub stock: f64,
    #[serde(rename = "unidad")]
    pub unit: Unit,
    #[serde(rename = "categoria")]
    pub category: Category,
}

// =============================================================================
// CATALOG FILTER
// =============================================================================

/// Category chip selection on the catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// `todas`
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("todas") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Catalog products matching a category and a free-text search.
///
/// The search is case-insensitive and matches the name or the description.
/// An empty search matches everything.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    category: CategoryFilter,
    search: &str,
) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| match &category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => &p.category == c,
        })
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
