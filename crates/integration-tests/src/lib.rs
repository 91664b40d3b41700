//! End-to-end tests for the VERSE storefront.
//!
//! Every test runs against a `wiremock` server standing in for both Shopify
//! and the VERSE backend, with the cart and size profile persisted in a
//! temporary directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verse-integration-tests
//! ```

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use tempfile::TempDir;
use url::Url;
use verse_storefront::backend::BackendClient;
use verse_storefront::cart::{CartStore, StoredCart};
use verse_storefront::checkout::PaymentsClient;
use verse_storefront::shopify::CatalogClient;
use verse_storefront::storage::FileStore;
use wiremock::MockServer;

/// Path the catalog client posts GraphQL queries to.
pub const GRAPHQL_PATH: &str = "/admin/api/2024-01/graphql.json";

/// Cart persisted in the test's data directory.
pub type LocalCart = CartStore<StoredCart<FileStore>>;

/// A mock server plus a scratch data directory.
pub struct TestContext {
    pub server: MockServer,
    pub data_dir: TempDir,
}

impl TestContext {
    /// Start a mock server and create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            data_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Open the file store, as a fresh process would.
    ///
    /// # Panics
    ///
    /// Panics if the store cannot be opened.
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::open(self.data_dir.path()).expect("Failed to open file store")
    }

    /// Open the cart, as a fresh process would.
    #[must_use]
    pub fn cart(&self) -> LocalCart {
        CartStore::new(StoredCart::new(self.file_store()))
    }

    /// Base URL of the mock backend.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&self.server.uri()).expect("Mock server URI is a URL")
    }

    /// Client for the mock backend.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn backend(&self) -> BackendClient {
        BackendClient::new(&self.base_url(), Duration::from_secs(5))
            .expect("Failed to build backend client")
    }

    #[must_use]
    pub fn payments(&self) -> PaymentsClient {
        PaymentsClient::new(self.backend())
    }

    /// Catalog client pointed at the mock GraphQL endpoint.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::with_endpoint(
            format!("{}{GRAPHQL_PATH}", self.server.uri()),
            SecretString::from("shpat_integration_test_token_8f3k2j"),
            Duration::from_secs(5),
        )
        .expect("Failed to build catalog client")
    }
}

/// A product node as returned by the Admin API.
#[must_use]
pub fn product_node(handle: &str, title: &str, amount: &str) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "title": title,
        "priceRangeV2": {"minVariantPrice": {"amount": amount, "currencyCode": "INR"}},
        "images": {"edges": [{"node": {"url": format!("https://cdn.shopify.com/{handle}.jpg"), "altText": title}}]}
    })
}

/// Valid checkout details.
#[must_use]
pub fn customer_details() -> verse_storefront::checkout::CustomerDetails {
    verse_storefront::checkout::CustomerDetails {
        full_name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9876543210".to_string(),
        address: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560001".to_string(),
    }
}
