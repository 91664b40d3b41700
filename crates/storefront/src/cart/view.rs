//! Display projection of the cart for terminal and API output.

use serde::Serialize;
use verse_core::{CurrencyCode, Price};

use super::{Cart, CartLine};
use crate::shopify::Money;

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub handle: String,
    pub title: String,
    pub size: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u64,
}

impl CartView {
    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Price::zero(CurrencyCode::default()).display(),
            item_count: 0,
        }
    }
}

fn format_price(money: &Money) -> String {
    money.display()
}

fn format_line_price(line: &CartLine) -> String {
    line.line_total().map_or_else(
        || format_price(&line.product.price),
        |total| format_price(&Money::new(total.to_string(), &line.product.price.currency_code)),
    )
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.to_string(),
            handle: line.product.handle.clone(),
            title: line.product.title.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            price: format_price(&line.product.price),
            line_price: format_line_price(line),
            image: line.product.image.clone(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }
        let currency = cart.currency_code().unwrap_or_default();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            subtotal: format_price(&Money::new(cart.total().to_string(), currency)),
            item_count: cart.item_count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::types::tests::product;

    #[test]
    fn test_empty_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "₹0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_view_formats_prices() {
        let cart: Cart = vec![
            CartLine::new(&product("a", "20"), 1, Some("M")),
            CartLine::new(&product("b", "15.5"), 2, None),
        ]
        .into_iter()
        .collect();

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "₹51.00");
        assert_eq!(view.items[0].size.as_deref(), Some("M"));
        assert_eq!(view.items[1].price, "₹15.50");
        assert_eq!(view.items[1].line_price, "₹31.00");
    }
}
