//! Cart lines and the cart itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use verse_core::ProductId;

use crate::shopify::{Money, Product};

/// Display data copied from a product when it is added to the cart.
///
/// The cart renders from this snapshot and never re-queries the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Shopify product GID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title at add-time.
    pub title: String,
    /// Unit price at add-time.
    pub price: Money,
    /// Thumbnail URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            price: product.price.clone(),
            image: product.featured_image().map(|img| img.url.clone()),
        }
    }
}

/// One row of the cart: a product/size combination and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken when the line was created.
    pub product: ProductSnapshot,
    /// Number of units. Never zero for a line stored in a [`Cart`].
    pub quantity: u32,
    /// Selected size; `None` means the product has no size distinction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLine {
    /// Create a line for `product`.
    #[must_use]
    pub fn new(product: &Product, quantity: u32, size: Option<&str>) -> Self {
        Self {
            product: ProductSnapshot::from(product),
            quantity,
            size: size.map(str::to_owned),
        }
    }

    /// The product half of the composite key.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Whether this line has the composite key `(product_id, size)`.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>) -> bool {
        self.product.id == *product_id && self.size.as_deref() == size
    }

    /// `unit price × quantity`, parsed from the snapshot.
    ///
    /// Returns `None` if the snapshot's amount is not a decimal.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .price
            .decimal()
            .and_then(|unit| unit.checked_mul(Decimal::from(self.quantity)))
    }
}

/// Ordered cart lines, at most one per `(product_id, size)`.
///
/// A `Cart` can only be built through upsert semantics, so a deserialized or
/// collected cart with duplicate keys is merged and zero-quantity lines are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Find the line with the given composite key.
    #[must_use]
    pub fn line(&self, product_id: &ProductId, size: Option<&str>) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(product_id, size))
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `unit price × quantity`, re-parsed from the snapshots.
    ///
    /// Lines whose price does not parse contribute nothing. Currencies are
    /// not converted; a mixed-currency total is meaningless.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .filter_map(|line| {
                let total = line.line_total();
                if total.is_none() {
                    tracing::warn!(
                        product_id = %line.product.id,
                        amount = %line.product.price.amount,
                        "Unparseable cart line price, excluded from total"
                    );
                }
                total
            })
            .fold(Decimal::ZERO, |acc, t| acc.saturating_add(t))
    }

    /// Currency code of the first line, if any.
    #[must_use]
    pub fn currency_code(&self) -> Option<&str> {
        self.lines
            .first()
            .map(|l| l.product.price.currency_code.as_str())
    }

    /// Add `line` or, if its key is present, increase that line's quantity.
    pub(crate) fn upsert(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        let size = line.size.clone();
        match self
            .lines
            .iter_mut()
            .find(|l| l.matches(&line.product.id, size.as_deref()))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Overwrite the quantity of an existing line. Returns `false` if absent.
    pub(crate) fn set_quantity(
        &mut self,
        product_id: &ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> bool {
        debug_assert!(quantity > 0);
        match self.lines.iter_mut().find(|l| l.matches(product_id, size)) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Drop the line with the given key. Returns `true` if a line was removed.
    pub(crate) fn remove(&mut self, product_id: &ProductId, size: Option<&str>) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_id, size));
        self.lines.len() != before
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = Self::new();
        for line in iter {
            cart.upsert(line);
        }
        cart
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        lines.into_iter().collect()
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
