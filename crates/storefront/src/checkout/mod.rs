//! Three-step checkout: details, payment, confirmation.
//!
//! A [`Checkout`] borrows the cart store for its whole lifetime, so nothing
//! else can change the cart between the total being shown and the order being
//! placed. The cart is cleared only after the backend has accepted the order.

mod details;
mod payments;

use thiserror::Error;
use tracing::{info, instrument};
use verse_core::{CurrencyCode, OrderId, PaymentMethod, Price};

use crate::backend::BackendError;
use crate::cart::{Cart, CartNotifier, CartPersistence, CartStore};
use crate::error::add_breadcrumb;

pub use details::{CustomerDetails, Field, FieldError, ValidationError};
pub use payments::{GatewayOrder, OrderConfirmation, PaymentVerification, PaymentsClient};

/// Currency every order is charged in.
pub const CHECKOUT_CURRENCY: CurrencyCode = CurrencyCode::INR;

/// Errors that stop checkout from progressing.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("your cart is empty")]
    EmptyCart,

    /// The customer details were rejected.
    #[error("invalid details: {0}")]
    Validation(#[from] ValidationError),

    /// The action does not apply at the current step.
    #[error("cannot {action} during the {step} step")]
    WrongStep {
        action: &'static str,
        step: &'static str,
    },

    /// The cart total cannot be charged.
    #[error("cart total {0} cannot be charged")]
    InvalidAmount(String),

    /// The backend rejected the payment signature.
    #[error("payment verification failed")]
    PaymentNotVerified,

    /// The verification is for a different gateway order.
    #[error("payment is for order {actual}, expected {expected}")]
    OrderMismatch { expected: OrderId, actual: OrderId },

    /// The order or payment service failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Where the customer is in checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Entering contact and shipping details.
    Details,
    /// Choosing and completing a payment method.
    Payment,
    /// Order placed.
    Confirmation {
        order_id: OrderId,
        method: PaymentMethod,
    },
}

impl CheckoutStep {
    /// Position in the progress indicator, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Details => 1,
            Self::Payment => 2,
            Self::Confirmation { .. } => 3,
        }
    }

    /// Name of the step.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Details => "details",
            Self::Payment => "payment",
            Self::Confirmation { .. } => "confirmation",
        }
    }
}

/// A checkout in progress.
pub struct Checkout<'a, P, N> {
    cart: &'a mut CartStore<P, N>,
    payments: &'a PaymentsClient,
    step: CheckoutStep,
    details: Option<CustomerDetails>,
    pending: Option<GatewayOrder>,
}

impl<'a, P: CartPersistence, N: CartNotifier> Checkout<'a, P, N> {
    /// Start checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn begin(
        cart: &'a mut CartStore<P, N>,
        payments: &'a PaymentsClient,
    ) -> Result<Self, CheckoutError> {
        if cart.load().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        add_breadcrumb("checkout", "Started checkout", None);
        Ok(Self {
            cart,
            payments,
            step: CheckoutStep::Details,
            details: None,
            pending: None,
        })
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> &CheckoutStep {
        &self.step
    }

    /// Details accepted at the first step.
    #[must_use]
    pub const fn details(&self) -> Option<&CustomerDetails> {
        self.details.as_ref()
    }

    /// The cart being checked out.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.cart.load()
    }

    /// Gateway order awaiting payment, if one was started.
    #[must_use]
    pub const fn pending_payment(&self) -> Option<&GatewayOrder> {
        self.pending.as_ref()
    }

    /// Validate `details` and move to the payment step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] listing every rejected field, or
    /// [`CheckoutError::WrongStep`] once the order has been placed.
    pub fn submit_details(&mut self, details: CustomerDetails) -> Result<(), CheckoutError> {
        if matches!(self.step, CheckoutStep::Confirmation { .. }) {
            return Err(self.wrong_step("submit details"));
        }
        details.validate()?;
        self.details = Some(details.trimmed());
        self.pending = None;
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Return from the payment step to edit details.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] unless at the payment step.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(self.wrong_step("go back"));
        }
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// Place a cash-on-delivery order, clear the cart and confirm.
    ///
    /// # Errors
    ///
    /// Returns an error if not at the payment step, the cart has emptied, or
    /// the backend fails. The step is unchanged on error.
    #[instrument(skip(self))]
    pub async fn place_cod_order(&mut self) -> Result<OrderId, CheckoutError> {
        let (details, cart) = self.ready_to_pay("place an order")?;

        let confirmation = self
            .payments
            .create_cod_order(&details, cart.lines(), cart.total())
            .await?;

        self.confirm(confirmation.order_id.clone(), PaymentMethod::Cod);
        Ok(confirmation.order_id)
    }

    /// Create a gateway order for the cart total, in paise.
    ///
    /// The returned order is handed to the payment widget; once the customer
    /// pays, finish with [`Checkout::confirm_online_payment`].
    ///
    /// # Errors
    ///
    /// Returns an error if not at the payment step, the total cannot be
    /// charged, or the backend fails.
    #[instrument(skip(self))]
    pub async fn start_online_payment(&mut self) -> Result<GatewayOrder, CheckoutError> {
        let (details, cart) = self.ready_to_pay("start a payment")?;

        let total = Price::new(cart.total(), CHECKOUT_CURRENCY);
        let amount = total
            .to_subunits()
            .filter(|amount| *amount > 0)
            .ok_or_else(|| CheckoutError::InvalidAmount(total.display()))?;

        let order = self
            .payments
            .create_online_order(amount, CHECKOUT_CURRENCY, &details, cart.lines())
            .await?;
        self.pending = Some(order.clone());
        Ok(order)
    }

    /// Verify a completed payment, clear the cart and confirm.
    ///
    /// # Errors
    ///
    /// Returns an error if no payment was started, the verification is for a
    /// different order, the signature is rejected, or the backend fails.
    #[instrument(skip(self, verification))]
    pub async fn confirm_online_payment(
        &mut self,
        verification: &PaymentVerification,
    ) -> Result<OrderId, CheckoutError> {
        let Some(pending) = &self.pending else {
            return Err(self.wrong_step("confirm a payment"));
        };
        if pending.id != verification.razorpay_order_id {
            return Err(CheckoutError::OrderMismatch {
                expected: pending.id.clone(),
                actual: verification.razorpay_order_id.clone(),
            });
        }

        let order_id = confirm_payment(self.cart, self.payments, verification).await?;
        self.pending = None;
        self.step = CheckoutStep::Confirmation {
            order_id: order_id.clone(),
            method: PaymentMethod::Online,
        };
        Ok(order_id)
    }

    fn ready_to_pay(&self, action: &'static str) -> Result<(CustomerDetails, Cart), CheckoutError> {
        let (CheckoutStep::Payment, Some(details)) = (&self.step, &self.details) else {
            return Err(self.wrong_step(action));
        };
        let cart = self.cart.load();
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok((details.clone(), cart))
    }

    fn confirm(&mut self, order_id: OrderId, method: PaymentMethod) {
        self.cart.clear();
        info!(order_id = %order_id, method = %method, "Order confirmed");
        add_breadcrumb(
            "checkout",
            "Order confirmed",
            Some(&[("order_id", order_id.as_str())]),
        );
        self.step = CheckoutStep::Confirmation { order_id, method };
    }

    const fn wrong_step(&self, action: &'static str) -> CheckoutError {
        CheckoutError::WrongStep {
            action,
            step: self.step.name(),
        }
    }
}

/// Verify a gateway payment and clear the cart.
///
/// Used directly when the payment completes in a different session from the
/// one that created the gateway order.
///
/// # Errors
///
/// Returns [`CheckoutError::PaymentNotVerified`] if the signature is rejected
/// or a backend error if verification fails. The cart is untouched on error.
pub async fn confirm_payment<P: CartPersistence, N: CartNotifier>(
    cart: &mut CartStore<P, N>,
    payments: &PaymentsClient,
    verification: &PaymentVerification,
) -> Result<OrderId, CheckoutError> {
    if !payments.verify_payment(verification).await? {
        return Err(CheckoutError::PaymentNotVerified);
    }

    let order_id = verification.razorpay_order_id.clone();
    cart.clear();
    info!(order_id = %order_id, payment_id = %verification.razorpay_payment_id, "Payment confirmed");
    add_breadcrumb(
        "checkout",
        "Payment confirmed",
        Some(&[("order_id", order_id.as_str())]),
    );
    Ok(order_id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::details::tests::valid_details;
    use super::*;
    use crate::backend::BackendClient;
    use crate::cart::StoredCart;
    use crate::cart::types::tests::product;
    use crate::storage::MemoryStore;

    fn payments(server: &MockServer) -> PaymentsClient {
        let base = Url::parse(&server.uri()).unwrap();
        PaymentsClient::new(BackendClient::new(&base, Duration::from_secs(5)).unwrap())
    }

    fn cart_with_items() -> CartStore<StoredCart<MemoryStore>> {
        let mut cart = CartStore::new(StoredCart::new(MemoryStore::new()));
        cart.add_item(&product("a", "20"), 1, Some("M"));
        cart.add_item(&product("b", "15"), 2, None);
        cart
    }

    #[tokio::test]
    async fn test_empty_cart_cannot_check_out() {
        let server = MockServer::start().await;
        let payments = payments(&server);
        let mut cart = CartStore::new(StoredCart::new(MemoryStore::new()));

        let result = Checkout::begin(&mut cart, &payments);
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_invalid_details_block_progression() {
        let server = MockServer::start().await;
        let payments = payments(&server);
        let mut cart = cart_with_items();
        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();

        let details = CustomerDetails {
            phone: "12345".to_string(),
            ..valid_details()
        };
        let err = checkout.submit_details(details).unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ref v) if v.has(Field::Phone)));
        assert_eq!(checkout.step(), &CheckoutStep::Details);
    }

    #[tokio::test]
    async fn test_cannot_pay_before_details() {
        let server = MockServer::start().await;
        let payments = payments(&server);
        let mut cart = cart_with_items();
        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();

        let err = checkout.place_cod_order().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot place an order during the details step"
        );
    }

    #[tokio::test]
    async fn test_cod_order_clears_cart_and_confirms() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/create-order-cod"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "orderId": "VERSE123456",
                "message": "Order placed successfully"
            })))
            .mount(&server)
            .await;
        let payments = payments(&server);
        let mut cart = cart_with_items();

        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
        checkout.submit_details(valid_details()).unwrap();
        assert_eq!(checkout.step().number(), 2);

        let order_id = checkout.place_cod_order().await.unwrap();
        assert_eq!(order_id.as_str(), "VERSE123456");
        assert_eq!(
            checkout.step(),
            &CheckoutStep::Confirmation {
                order_id,
                method: PaymentMethod::Cod
            }
        );
        assert!(cart.load().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_cart_and_step() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "db down"})))
            .mount(&server)
            .await;
        let payments = payments(&server);
        let mut cart = cart_with_items();

        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
        checkout.submit_details(valid_details()).unwrap();
        assert!(matches!(
            checkout.place_cod_order().await,
            Err(CheckoutError::Backend(_))
        ));
        assert_eq!(checkout.step(), &CheckoutStep::Payment);
        assert_eq!(cart.item_count(), 3);
    }

    #[tokio::test]
    async fn test_online_payment_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/create-order-online"))
            .and(wiremock::matchers::body_partial_json(
                json!({"amount": 5000, "currency": "INR"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_Nx1",
                "amount": 5000,
                "currency": "INR",
                "status": "created"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/verify-payment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;
        let payments = payments(&server);
        let mut cart = cart_with_items();

        let mut checkout = Checkout::begin(&mut cart, &payments).unwrap();
        checkout.submit_details(valid_details()).unwrap();
        let order = checkout.start_online_payment().await.unwrap();
        assert_eq!(order.amount, 5000);

        let wrong = PaymentVerification {
            razorpay_order_id: OrderId::new("order_other"),
            razorpay_payment_id: verse_core::PaymentId::new("pay_1"),
            razorpay_signature: "sig".to_string(),
        };
        assert!(matches!(
            checkout.confirm_online_payment(&wrong).await,
            Err(CheckoutError::OrderMismatch { .. })
        ));

        let verification = PaymentVerification {
            razorpay_order_id: order.id.clone(),
            ..wrong
        };
        let order_id = checkout.confirm_online_payment(&verification).await.unwrap();
        assert_eq!(order_id.as_str(), "order_Nx1");
        assert!(matches!(
            checkout.step(),
            CheckoutStep::Confirmation {
                method: PaymentMethod::Online,
                ..
            }
        ));
        assert!(cart.load().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_signature_keeps_cart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/verify-payment"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "Payment verification failed"})),
            )
            .mount(&server)
            .await;
        let payments = payments(&server);
        let mut cart = cart_with_items();

        let verification = PaymentVerification {
            razorpay_order_id: OrderId::new("order_Nx1"),
            razorpay_payment_id: verse_core::PaymentId::new("pay_1"),
            razorpay_signature: "forged".to_string(),
        };
        let err = confirm_payment(&mut cart, &payments, &verification)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentNotVerified));
        assert_eq!(cart.item_count(), 3);
    }
}
