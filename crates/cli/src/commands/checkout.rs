//! Checkout commands.
//!
//! A cash-on-delivery order completes in one run. An online payment spans two
//! runs: `checkout online` creates the gateway order, the customer pays in the
//! gateway widget, and `checkout confirm` verifies the signature.

use verse_core::{OrderId, PaymentId};
use verse_storefront::cart::CartView;
use verse_storefront::checkout::{Checkout, CustomerDetails, PaymentVerification, confirm_payment};
use verse_storefront::error::AppError;

use super::{Context, print_cart};

/// `verse checkout cod`
pub async fn cod(ctx: &Context, details: CustomerDetails) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    let payments = ctx.payments()?;
    print_cart(&CartView::from(&cart.load()));

    let mut checkout = Checkout::begin(&mut cart, &payments)?;
    checkout.submit_details(details)?;
    let order_id = checkout.place_cod_order().await?;

    println!();
    println!("Order placed! Your order ID is {order_id}.");
    println!("Pay in cash when your order arrives.");
    Ok(())
}

/// `verse checkout online`
pub async fn online(ctx: &Context, details: CustomerDetails) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    let payments = ctx.payments()?;
    print_cart(&CartView::from(&cart.load()));

    let mut checkout = Checkout::begin(&mut cart, &payments)?;
    checkout.submit_details(details)?;
    let order = checkout.start_online_payment().await?;

    println!();
    println!("Payment order created: {}", order.id);
    println!("Amount: {} {} (subunits)", order.amount, order.currency);
    println!("Complete the payment, then run:");
    println!(
        "  verse checkout confirm --order-id {} --payment-id <id> --signature <signature>",
        order.id
    );
    Ok(())
}

/// `verse checkout confirm`
pub async fn confirm(
    ctx: &Context,
    order_id: String,
    payment_id: String,
    signature: String,
) -> Result<(), AppError> {
    let mut cart = ctx.cart()?;
    let payments = ctx.payments()?;
    let verification = PaymentVerification {
        razorpay_order_id: OrderId::new(order_id),
        razorpay_payment_id: PaymentId::new(payment_id),
        razorpay_signature: signature,
    };

    let order_id = confirm_payment(&mut cart, &payments, &verification).await?;
    println!("Payment verified. Your order ID is {order_id}.");
    Ok(())
}
