//! Domain types for the Shopify catalog.
//!
//! These types provide a clean, ergonomic API separate from the raw GraphQL
//! response shapes in `catalog::queries`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use verse_core::{CurrencyCode, Price, ProductId};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a money value from its string parts.
    #[must_use]
    pub fn new(amount: impl Into<String>, currency_code: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            currency_code: currency_code.into(),
        }
    }

    /// Parse the amount as a decimal.
    ///
    /// Returns `None` if the amount is not a valid decimal string.
    #[must_use]
    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim()).ok()
    }

    /// Convert to a typed [`Price`].
    ///
    /// Returns `None` if the amount does not parse or the currency is not one
    /// the storefront sells in.
    #[must_use]
    pub fn to_price(&self) -> Option<Price> {
        let currency = CurrencyCode::from_str(&self.currency_code).ok()?;
        Some(Price::new(self.decimal()?, currency))
    }

    /// Format for display, falling back to the raw amount.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_price().map_or_else(
            || format!("{} {}", self.amount, self.currency_code),
            |price| price.display(),
        )
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Shopify product GID.
    pub id: ProductId,
    /// URL handle (e.g. `linen-camp-shirt`).
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Minimum variant price.
    pub price: Money,
    /// Product images, in display order.
    pub images: Vec<Image>,
}

impl Product {
    /// The first image, used as the product thumbnail.
    #[must_use]
    pub fn featured_image(&self) -> Option<&Image> {
        self.images.first()
    }
}
