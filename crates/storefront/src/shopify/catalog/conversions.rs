//! Raw GraphQL nodes to domain types.

use verse_core::ProductId;

use crate::shopify::types::{Image, Money, Product};

use super::queries::{ImageConnection, ProductNode, get_products};

pub fn convert_product(node: ProductNode) -> Product {
    let price = node.price_range_v2.min_variant_price;
    Product {
        id: ProductId::new(node.id),
        handle: node.handle,
        title: node.title,
        price: Money::new(price.amount, price.currency_code),
        images: convert_images(node.images),
    }
}

pub fn convert_product_connection(connection: get_products::ProductConnection) -> Vec<Product> {
    connection
        .edges
        .into_iter()
        .map(|edge| convert_product(edge.node))
        .collect()
}

fn convert_images(images: ImageConnection) -> Vec<Image> {
    images
        .edges
        .into_iter()
        .map(|edge| Image {
            url: edge.node.url,
            alt_text: edge.node.alt_text,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_product_keeps_image_order() {
        let node: ProductNode = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/1",
            "handle": "oversized-tee",
            "title": "Oversized Tee",
            "priceRangeV2": {"minVariantPrice": {"amount": "799.0", "currencyCode": "INR"}},
            "images": {"edges": [
                {"node": {"url": "https://cdn.shopify.com/front.jpg", "altText": "Front"}},
                {"node": {"url": "https://cdn.shopify.com/back.jpg", "altText": null}}
            ]}
        }))
        .unwrap();

        let product = convert_product(node);
        assert_eq!(product.id.as_str(), "gid://shopify/Product/1");
        assert_eq!(product.price, Money::new("799.0", "INR"));
        assert_eq!(product.images.len(), 2);
        assert_eq!(
            product.featured_image().unwrap().url,
            "https://cdn.shopify.com/front.jpg"
        );
        assert!(product.images[1].alt_text.is_none());
    }
}
