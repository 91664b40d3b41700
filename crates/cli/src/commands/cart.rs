//! Cart commands.

use verse_core::ProductId;
use verse_storefront::cart::CartView;
use verse_storefront::error::AppError;

use super::{Context, find_product, print_cart};

/// `verse cart show`
pub fn show(ctx: &Context) -> Result<(), AppError> {
    let cart = ctx.cart()?;
    print_cart(&CartView::from(&cart.load()));
    Ok(())
}

/// `verse cart add <handle>`
pub async fn add(
    ctx: &Context,
    handle: &str,
    quantity: u32,
    size: Option<&str>,
) -> Result<(), AppError> {
    if quantity == 0 {
        return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
    }
    let catalog = ctx.catalog()?;
    let product = find_product(&catalog, handle).await?;

    let mut cart = ctx.cart()?;
    cart.add_item(&product, quantity, size);
    println!("Added {quantity} x {} to your cart.", product.title);
    print_cart(&CartView::from(&cart.load()));
    Ok(())
}

/// `verse cart set <product-id> <quantity>`
pub fn set(
    ctx: &Context,
    product_id: &str,
    quantity: i64,
    size: Option<&str>,
) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    cart.set_quantity(&ProductId::new(product_id), quantity, size);
    print_cart(&CartView::from(&cart.load()));
    Ok(())
}

/// `verse cart remove <product-id>`
pub fn remove(ctx: &Context, product_id: &str, size: Option<&str>) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    cart.remove_item(&ProductId::new(product_id), size);
    print_cart(&CartView::from(&cart.load()));
    Ok(())
}

/// `verse cart clear`
pub fn clear(ctx: &Context) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    cart.clear();
    println!("Your cart is empty.");
    Ok(())
}
