//! GraphQL documents and raw response shapes for the Admin API catalog.
//!
//! The response structs mirror Shopify's JSON exactly (connections with
//! `edges { node }`); `conversions` maps them onto the domain types.

use graphql_client::QueryBody;
use serde::{Deserialize, Serialize};

// `concat!` only accepts literals, so the fragment is spliced with a macro.
macro_rules! product_query {
    ($head:literal, $tail:literal) => {
        concat!(
            $head,
            "
    id
    handle
    title
    priceRangeV2 {
      minVariantPrice {
        amount
        currencyCode
      }
    }
    images(first: 5) {
      edges {
        node {
          url
          altText
        }
      }
    }
",
            $tail
        )
    };
}

pub const GET_PRODUCTS: &str = product_query!(
    "query GetProducts($first: Int!) {\n  products(first: $first) {\n    edges {\n      node {",
    "      }\n    }\n  }\n}\n"
);

pub const GET_PRODUCT_BY_HANDLE: &str = product_query!(
    "query GetProductByHandle($handle: String!) {\n  productByHandle(handle: $handle) {",
    "  }\n}\n"
);

// =============================================================================
// GetProducts
// =============================================================================

pub mod get_products {
    use super::{Deserialize, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProducts";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnection,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductConnection {
        pub edges: Vec<ProductEdge>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductEdge {
        pub node: ProductNode,
    }
}

// =============================================================================
// GetProductByHandle
// =============================================================================

pub mod get_product_by_handle {
    use super::{Deserialize, ProductNode, Serialize};

    pub const OPERATION_NAME: &str = "GetProductByHandle";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_by_handle: Option<ProductNode>,
    }
}

// =============================================================================
// Shared nodes
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub price_range_v2: PriceRange,
    pub images: ImageConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: MoneyNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageConnection {
    pub edges: Vec<ImageEdge>,
}

#[derive(Debug, Deserialize)]
pub struct ImageEdge {
    pub node: ImageNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    pub alt_text: Option<String>,
}

/// Build the request envelope for `GetProducts`.
pub fn products_body(first: i64) -> QueryBody<get_products::Variables> {
    QueryBody {
        variables: get_products::Variables { first },
        query: GET_PRODUCTS,
        operation_name: get_products::OPERATION_NAME,
    }
}

/// Build the request envelope for `GetProductByHandle`.
pub fn product_by_handle_body(handle: &str) -> QueryBody<get_product_by_handle::Variables> {
    QueryBody {
        variables: get_product_by_handle::Variables {
            handle: handle.to_string(),
        },
        query: GET_PRODUCT_BY_HANDLE,
        operation_name: get_product_by_handle::OPERATION_NAME,
    }
}
