//! Shopify catalog client.
//!
//! # Architecture
//!
//! - Admin GraphQL API, queried with `graphql_client` request/response envelopes
//! - Shopify is the source of truth for products; nothing is synced locally
//! - In-memory caching via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use verse_storefront::shopify::{Catalog, CatalogClient};
//!
//! let catalog = CatalogClient::new(&config.shopify, config.http_timeout)?;
//!
//! let products = catalog.fetch_products(20).await?;
//! let product = catalog.fetch_product_by_handle("linen-camp-shirt").await?;
//! ```

mod catalog;
pub mod types;

pub use catalog::{Catalog, CatalogClient, DEFAULT_PRODUCT_LIMIT};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to Shopify.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("Shopify returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response carried neither data nor errors.
    #[error("Shopify response contained no data")]
    EmptyResponse,

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error.locations.map_or_else(Vec::new, |locations| {
                locations
                    .into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: error.path.map_or_else(Vec::new, |path| {
                path.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(key) => serde_json::Value::String(key),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(message: &str) -> GraphQLError {
        GraphQLError {
            message: message.to_string(),
            locations: vec![],
            path: vec![],
        }
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL(vec![
            error("Access denied for products field"),
            error("Throttled"),
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Access denied for products field; Throttled"
        );
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let err = ShopifyError::GraphQL(vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 3, column: 7 }],
            path: vec![
                serde_json::Value::String("productByHandle".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: productByHandle.0 at line 3:7"
        );
    }

    #[test]
    fn test_graphql_error_without_details() {
        assert_eq!(
            ShopifyError::GraphQL(vec![error("")]).to_string(),
            "GraphQL errors: [error 1]: (no details)"
        );
        assert_eq!(
            ShopifyError::GraphQL(vec![]).to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }
}
