//! Catalog browsing.

use verse_storefront::error::AppError;
use verse_storefront::shopify::Product;

use super::{Context, find_product};

/// `verse products list`
pub async fn list(ctx: &Context, limit: u32) -> Result<(), AppError> {
    let catalog = ctx.catalog()?;
    let products = catalog.get_products(limit).await?;
    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }
    for product in &products {
        println!("{:<32} {:<40} {:>12}", product.handle, product.title, product.price.display());
    }
    Ok(())
}

/// `verse products show <handle>`
pub async fn show(ctx: &Context, handle: &str) -> Result<(), AppError> {
    let catalog = ctx.catalog()?;
    let product = find_product(&catalog, handle).await?;
    print_product(&product);
    Ok(())
}

fn print_product(product: &Product) {
    println!("{}", product.title);
    println!("  handle: {}", product.handle);
    println!("  id:     {}", product.id);
    println!("  price:  {}", product.price.display());
    for image in &product.images {
        match &image.alt_text {
            Some(alt) => println!("  image:  {} ({alt})", image.url),
            None => println!("  image:  {}", image.url),
        }
    }
}
