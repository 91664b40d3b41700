//! Catalog to cart to order, against a mocked Shopify and backend.

use serde_json::json;
use verse_core::{OrderId, PaymentId, PaymentMethod};
use verse_integration_tests::{GRAPHQL_PATH, TestContext, customer_details, product_node};
use verse_storefront::checkout::{
    Checkout, CheckoutError, CheckoutStep, CustomerDetails, PaymentVerification, confirm_payment,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_product(ctx: &TestContext, handle: &str, title: &str, amount: &str) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"handle": handle}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"productByHandle": product_node(handle, title, amount)}
        })))
        .mount(&ctx.server)
        .await;
}

async fn fill_cart(ctx: &TestContext) {
    mount_product(ctx, "oxford", "Oxford Shirt", "1499.00").await;
    mount_product(ctx, "linen", "Linen Shirt", "999.50").await;

    let catalog = ctx.catalog();
    let oxford = catalog.get_product_by_handle("oxford").await.unwrap().unwrap();
    let linen = catalog.get_product_by_handle("linen").await.unwrap().unwrap();

    let mut cart = ctx.cart();
    cart.add_item(&oxford, 1, Some("M"));
    cart.add_item(&oxford, 1, Some("M"));
    cart.add_item(&linen, 1, Some("L"));
}

#[tokio::test]
async fn test_cod_order_end_to_end() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/api/create-order-cod"))
        .and(body_partial_json(json!({
            "customerDetails": {"fullName": "Asha Rao", "pincode": "560001"},
            "total": 3997.5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "orderId": "VRS-20240601-0042",
            "message": "Order placed successfully"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    // New process: the cart comes back from disk
    let mut cart = ctx.cart();
    assert_eq!(cart.item_count(), 3);
    let payments = ctx.payments();

    let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
    checkout.submit_details(customer_details()).unwrap();
    let order_id = checkout.place_cod_order().await.unwrap();

    assert_eq!(order_id, OrderId::new("VRS-20240601-0042"));
    assert_eq!(
        *checkout.step(),
        CheckoutStep::Confirmation {
            order_id,
            method: PaymentMethod::Cod,
        }
    );
    drop(checkout);

    assert!(cart.load().is_empty());
    assert!(ctx.cart().load().is_empty());
}

#[tokio::test]
async fn test_online_payment_across_sessions() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/api/create-order-online"))
        .and(body_partial_json(json!({"amount": 399_750, "currency": "INR"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_NXt4abc",
            "amount": 399_750,
            "currency": "INR",
            "status": "created"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/verify-payment"))
        .and(body_partial_json(json!({"razorpay_order_id": "order_NXt4abc"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "orderId": "order_NXt4abc"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let payments = ctx.payments();
    let order = {
        let mut cart = ctx.cart();
        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
        checkout.submit_details(customer_details()).unwrap();
        checkout.start_online_payment().await.unwrap()
    };
    assert_eq!(order.amount, 399_750);

    // The cart survives until the payment is verified
    assert_eq!(ctx.cart().item_count(), 3);

    let mut cart = ctx.cart();
    let verification = PaymentVerification {
        razorpay_order_id: order.id.clone(),
        razorpay_payment_id: PaymentId::new("pay_29QQoUBi66xm2f"),
        razorpay_signature: "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d"
            .to_string(),
    };
    let order_id = confirm_payment(&mut cart, &payments, &verification)
        .await
        .unwrap();
    assert_eq!(order_id, order.id);
    assert!(ctx.cart().load().is_empty());
}

#[tokio::test]
async fn test_rejected_signature_keeps_cart() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/api/verify-payment"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Invalid payment signature"})),
        )
        .mount(&ctx.server)
        .await;

    let mut cart = ctx.cart();
    let verification = PaymentVerification {
        razorpay_order_id: OrderId::new("order_forged"),
        razorpay_payment_id: PaymentId::new("pay_forged"),
        razorpay_signature: "bad".to_string(),
    };
    let err = confirm_payment(&mut cart, &ctx.payments(), &verification)
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::PaymentNotVerified));
    assert_eq!(ctx.cart().item_count(), 3);
}

#[tokio::test]
async fn test_backend_failure_leaves_checkout_at_payment() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/api/create-order-cod"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "Shopify is down"})),
        )
        .mount(&ctx.server)
        .await;

    let mut cart = ctx.cart();
    let payments = ctx.payments();
    let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
    checkout.submit_details(customer_details()).unwrap();

    let err = checkout.place_cod_order().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Backend(_)));
    assert_eq!(*checkout.step(), CheckoutStep::Payment);
    drop(checkout);

    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn test_invalid_details_block_checkout() {
    let ctx = TestContext::new().await;
    fill_cart(&ctx).await;

    let mut cart = ctx.cart();
    let payments = ctx.payments();
    let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();

    let details = CustomerDetails {
        phone: "12345".to_string(),
        pincode: "ABC123".to_string(),
        ..customer_details()
    };
    let Err(CheckoutError::Validation(errors)) = checkout.submit_details(details) else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.errors.len(), 2);
    assert_eq!(*checkout.step(), CheckoutStep::Details);
}

#[tokio::test]
async fn test_empty_cart_cannot_check_out() {
    let ctx = TestContext::new().await;
    let mut cart = ctx.cart();
    let payments = ctx.payments();

    assert!(matches!(
        Checkout::begin(&mut cart, &payments),
        Err(CheckoutError::EmptyCart)
    ));
}
