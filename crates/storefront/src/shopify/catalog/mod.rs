//! Shopify Admin API catalog client.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Caches products using `moka` (5-minute TTL).

mod cache;
mod conversions;
mod queries;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ShopifyConfig;
use crate::shopify::ShopifyError;
use crate::shopify::types::Product;

use cache::{CacheKey, CacheValue};
use conversions::{convert_product, convert_product_connection};
use queries::{get_product_by_handle, get_products, product_by_handle_body, products_body};

/// Number of products listed when the caller does not say.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 20;

/// Largest page the Admin API returns for a connection.
const MAX_PRODUCT_LIMIT: u32 = 250;

/// Read access to the product catalog.
pub trait Catalog: Send + Sync {
    /// List up to `limit` products in catalog order.
    fn fetch_products(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Product>, ShopifyError>> + Send;

    /// Look up a product by URL handle. `Ok(None)` if no product has it.
    fn fetch_product_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<Product>, ShopifyError>> + Send;
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the Shopify Admin GraphQL API.
///
/// Products are cached for 5 minutes. Cloning is cheap and shares the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a client for the store in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig, timeout: Duration) -> Result<Self, ShopifyError> {
        Self::with_endpoint(
            config.graphql_endpoint(),
            config.admin_api_token.clone(),
            timeout,
        )
    }

    /// Create a client against an explicit GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, ShopifyError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                endpoint: endpoint.into(),
                access_token,
                cache,
            }),
        })
    }

    /// Execute a GraphQL query.
    async fn execute<V, D>(&self, body: QueryBody<V>) -> Result<D, ShopifyError>
    where
        V: Serialize + Send + Sync,
        D: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(
                "X-Shopify-Access-Token",
                self.inner.access_token.expose_secret(),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status,
                body: truncate(&response_text, 200),
            });
        }

        let response: Response<D> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse Shopify GraphQL response"
            );
            ShopifyError::Parse(e)
        })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(Into::into).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::EmptyResponse
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List up to `limit` products. The limit is clamped to `1..=250`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self, limit: u32) -> Result<Vec<Product>, ShopifyError> {
        let first = i64::from(limit.clamp(1, MAX_PRODUCT_LIMIT));
        let cache_key = CacheKey::Products { limit: first };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let data: get_products::ResponseData = self.execute(products_body(first)).await?;
        let products = convert_product_connection(data.products);
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its handle. `Ok(None)` if Shopify has no such product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<Product>, ShopifyError> {
        let cache_key = CacheKey::Product(handle.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let data: get_product_by_handle::ResponseData =
            self.execute(product_by_handle_body(handle)).await?;

        let Some(node) = data.product_by_handle else {
            debug!("Product not found");
            return Ok(None);
        };
        let product = convert_product(node);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

impl Catalog for CatalogClient {
    async fn fetch_products(&self, limit: u32) -> Result<Vec<Product>, ShopifyError> {
        self.get_products(limit).await
    }

    async fn fetch_product_by_handle(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        self.get_product_by_handle(handle).await
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const TOKEN: &str = "shpat_3f9c1a7be24d";

    fn client(server: &MockServer) -> CatalogClient {
        CatalogClient::with_endpoint(
            format!("{}/admin/api/2024-01/graphql.json", server.uri()),
            SecretString::from(TOKEN),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn product_node(n: u32) -> serde_json::Value {
        json!({
            "id": format!("gid://shopify/Product/{n}"),
            "handle": format!("tee-{n}"),
            "title": format!("Tee {n}"),
            "priceRangeV2": {"minVariantPrice": {"amount": "999.00", "currencyCode": "INR"}},
            "images": {"edges": [{"node": {"url": format!("https://cdn.shopify.com/{n}.jpg"), "altText": null}}]}
        })
    }

    #[tokio::test]
    async fn test_get_products_sends_admin_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/api/2024-01/graphql.json"))
            .and(header("X-Shopify-Access-Token", TOKEN))
            .and(body_partial_json(json!({"variables": {"first": 2}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"products": {"edges": [{"node": product_node(1)}, {"node": product_node(2)}]}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = client(&server);
        let products = catalog.fetch_products(2).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].handle, "tee-1");

        // Second call is served from the cache
        let cached = catalog.fetch_products(2).await.unwrap();
        assert_eq!(cached, products);
    }

    #[tokio::test]
    async fn test_get_product_by_handle_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"variables": {"handle": "ghost"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"productByHandle": null}})),
            )
            .mount(&server)
            .await;

        let product = client(&server)
            .fetch_product_by_handle("ghost")
            .await
            .unwrap();
        assert!(product.is_none());
    }

    #[tokio::test]
    async fn test_graphql_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{"message": "Access denied for products field."}]
            })))
            .mount(&server)
            .await;

        let err = client(&server).fetch_products(5).await.unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("Access denied"));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "4"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_products(5).await.unwrap_err();
        assert!(matches!(err, ShopifyError::RateLimited(4)));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let err = client(&server).fetch_products(5).await.unwrap_err();
        assert!(
            matches!(err, ShopifyError::Status { status, ref body } if status.as_u16() == 401 && body == "Invalid API key")
        );
    }
}
