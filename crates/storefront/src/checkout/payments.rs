//! Order creation and payment verification endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use verse_core::{CurrencyCode, OrderId, PaymentId};

use crate::backend::{BackendClient, BackendError, read_json};
use crate::cart::CartLine;

use super::details::CustomerDetails;

/// A cash-on-delivery order accepted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    #[serde(default)]
    pub message: String,
}

/// An order created with the payment gateway, awaiting payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order id, e.g. `order_NXt4...`.
    pub id: OrderId,
    /// Amount in currency subunits.
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub receipt: Option<String>,
}

/// Gateway callback data proving a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentVerification {
    pub razorpay_order_id: OrderId,
    pub razorpay_payment_id: PaymentId,
    pub razorpay_signature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CodOrderRequest<'a> {
    customer_details: &'a CustomerDetails,
    items: &'a [CartLine],
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OnlineOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    customer_details: &'a CustomerDetails,
    items: &'a [CartLine],
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    status: Option<String>,
}

/// Client for the order and payment endpoints.
#[derive(Debug, Clone)]
pub struct PaymentsClient {
    backend: BackendClient,
}

impl PaymentsClient {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Place a cash-on-delivery order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or is unreachable.
    #[instrument(skip(self, details, items), fields(lines = items.len(), total = %total))]
    pub async fn create_cod_order(
        &self,
        details: &CustomerDetails,
        items: &[CartLine],
        total: Decimal,
    ) -> Result<OrderConfirmation, BackendError> {
        let request = CodOrderRequest {
            customer_details: details,
            items,
            total,
        };
        let confirmation: OrderConfirmation =
            self.backend.call("create-order-cod", &request).await?;
        info!(order_id = %confirmation.order_id, "COD order placed");
        Ok(confirmation)
    }

    /// Create a gateway order for `amount` subunits of `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order or is unreachable.
    #[instrument(skip(self, details, items), fields(lines = items.len()))]
    pub async fn create_online_order(
        &self,
        amount: u64,
        currency: CurrencyCode,
        details: &CustomerDetails,
        items: &[CartLine],
    ) -> Result<GatewayOrder, BackendError> {
        let request = OnlineOrderRequest {
            amount,
            currency: currency.code(),
            customer_details: details,
            items,
        };
        let order: GatewayOrder = self.backend.call("create-order-online", &request).await?;
        info!(gateway_order_id = %order.id, amount = order.amount, "Gateway order created");
        Ok(order)
    }

    /// Check a payment signature with the backend.
    ///
    /// Returns `false` when the backend rejects the signature.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails for any other reason.
    #[instrument(skip(self, verification), fields(order_id = %verification.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        verification: &PaymentVerification,
    ) -> Result<bool, BackendError> {
        let response = self.backend.post_json("verify-payment", verification).await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            let status = response.status();
            let body = response.text().await?;
            warn!(error = %crate::backend::api_error(status, &body), "Payment signature rejected");
            return Ok(false);
        }

        let body: VerifyResponse = read_json(response).await?;
        Ok(body.status.as_deref() == Some("success"))
    }
}
