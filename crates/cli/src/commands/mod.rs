//! Command implementations.
//!
//! Each command builds the clients it needs from [`Context`], so commands
//! that never touch the catalog work without Shopify credentials.

pub mod advisor;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod try_on;

use verse_storefront::advisor::{AdvisorClient, SizeProfileStore};
use verse_storefront::backend::BackendClient;
use verse_storefront::cart::{CartStore, CartView, StoredCart};
use verse_storefront::checkout::PaymentsClient;
use verse_storefront::config::StorefrontConfig;
use verse_storefront::error::AppError;
use verse_storefront::shopify::{CatalogClient, Product};
use verse_storefront::storage::FileStore;
use verse_storefront::tryon::TryOnClient;

/// Cart backed by the data directory.
pub type LocalCart = CartStore<StoredCart<FileStore>>;

/// Configuration shared by all commands.
pub struct Context {
    config: StorefrontConfig,
}

impl Context {
    pub const fn new(config: StorefrontConfig) -> Self {
        Self { config }
    }

    fn store(&self) -> Result<FileStore, AppError> {
        Ok(FileStore::open(&self.config.data_dir)?)
    }

    pub fn cart(&self) -> Result<LocalCart, AppError> {
        Ok(CartStore::new(StoredCart::new(self.store()?)))
    }

    pub fn size_profiles(&self) -> Result<SizeProfileStore<FileStore>, AppError> {
        Ok(SizeProfileStore::new(self.store()?))
    }

    pub fn catalog(&self) -> Result<CatalogClient, AppError> {
        let shopify = self.config.require_shopify()?;
        Ok(CatalogClient::new(shopify, self.config.http_timeout)?)
    }

    fn backend(&self) -> Result<BackendClient, AppError> {
        Ok(BackendClient::new(
            &self.config.api_base_url,
            self.config.http_timeout,
        )?)
    }

    pub fn advisor(&self) -> Result<AdvisorClient, AppError> {
        Ok(AdvisorClient::new(self.backend()?))
    }

    pub fn payments(&self) -> Result<PaymentsClient, AppError> {
        Ok(PaymentsClient::new(self.backend()?))
    }

    pub fn try_on(&self) -> Result<TryOnClient, AppError> {
        Ok(TryOnClient::new(
            &self.config.api_base_url,
            self.config.tryon_timeout,
        )?)
    }
}

/// Fetch a product or fail with [`AppError::NotFound`].
pub async fn find_product(catalog: &CatalogClient, handle: &str) -> Result<Product, AppError> {
    catalog
        .get_product_by_handle(handle)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product '{handle}'")))
}

/// Print the cart as a table.
pub fn print_cart(view: &CartView) {
    if view.items.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for item in &view.items {
        let size = item.size.as_deref().unwrap_or("-");
        println!(
            "{:<40} {:>4}  x{:<3} {:>12}  {}",
            item.title, size, item.quantity, item.line_price, item.product_id
        );
    }
    println!("{} item(s), subtotal {}", view.item_count, view.subtotal);
}
