//! AI advisory client: size recommendations, style advice, order tracking.
//!
//! All calls are JSON POSTs to the VERSE backend. Inputs the backend would
//! reject are checked locally first and reported as
//! [`AdvisorError::InvalidInput`].

mod profile;
mod types;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::backend::{BackendClient, BackendError, read_json};

pub use profile::{SIZE_PROFILE_KEY, SizeProfile, SizeProfileStore};
pub use types::{
    BodyType, ChatReply, FitPreference, OrderTracking, ProductContext, SizeQuery,
    SizeRecommendation, TimelineEvent, TrackingResult, UnknownOption,
};

use types::{ChatRequest, NotFoundBody, StyleChatRequest, StyleChatResponse, TrackOrderRequest};

/// Errors from the advisory endpoints.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The request was rejected before being sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Client for the AI advisory endpoints.
#[derive(Debug, Clone)]
pub struct AdvisorClient {
    backend: BackendClient,
}

impl AdvisorClient {
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Recommend a shirt size for the given measurements.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] unless height and weight are
    /// positive, or a backend error if the call fails.
    #[instrument(skip(self), fields(body_type = %query.body_type, fit = %query.fit_preference))]
    pub async fn size_recommendation(
        &self,
        query: &SizeQuery,
    ) -> Result<SizeRecommendation, AdvisorError> {
        if !(query.height_cm.is_finite() && query.height_cm > 0.0) {
            return Err(AdvisorError::InvalidInput(
                "height must be a positive number of centimetres".to_string(),
            ));
        }
        if !(query.weight_kg.is_finite() && query.weight_kg > 0.0) {
            return Err(AdvisorError::InvalidInput(
                "weight must be a positive number of kilograms".to_string(),
            ));
        }

        let recommendation: SizeRecommendation =
            self.backend.call("size-recommend", query).await?;
        debug!(size = %recommendation.size, confidence = recommendation.confidence, "Size recommended");
        Ok(recommendation)
    }

    /// Ask the stylist a question, optionally about a specific product.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] for an empty question, or a
    /// backend error if the call fails.
    #[instrument(skip(self, question, product))]
    pub async fn style_advice(
        &self,
        question: &str,
        product: Option<&ProductContext>,
    ) -> Result<String, AdvisorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "question is required".to_string(),
            ));
        }

        let request = StyleChatRequest {
            question,
            product_context: product,
        };
        let response: StyleChatResponse = self.backend.call("style-chat", &request).await?;
        Ok(response.response)
    }

    /// Look up an order by id or by the phone number it was placed with.
    ///
    /// An unknown order is a normal [`TrackingResult::NotFound`], not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] if both identifiers are empty,
    /// or a backend error if the call fails.
    #[instrument(skip(self, phone))]
    pub async fn track_order(
        &self,
        order_id: &str,
        phone: &str,
    ) -> Result<TrackingResult, AdvisorError> {
        let order_id = order_id.trim();
        let phone = phone.trim();
        if order_id.is_empty() && phone.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "order ID or phone number is required".to_string(),
            ));
        }

        let request = TrackOrderRequest { order_id, phone };
        let response = self.backend.post_json("track-order", &request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = response.text().await.map_err(BackendError::from)?;
            let not_found: NotFoundBody =
                serde_json::from_str(&body).map_err(BackendError::from)?;
            debug!("Order not found");
            return Ok(TrackingResult::NotFound {
                message: not_found
                    .message
                    .unwrap_or_else(|| "Order not found.".to_string()),
                suggestion: not_found.suggestion,
            });
        }

        let tracking: OrderTracking = read_json(response).await?;
        debug!(status = %tracking.status, "Order found");
        Ok(TrackingResult::Found(tracking))
    }

    /// Send a free-form prompt with optional JSON context.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidInput`] for an empty prompt, or a
    /// backend error if the call fails.
    #[instrument(skip(self, prompt, context))]
    pub async fn chat(
        &self,
        prompt: &str,
        context: Option<&serde_json::Value>,
    ) -> Result<ChatReply, AdvisorError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AdvisorError::InvalidInput("prompt is required".to_string()));
        }

        let request = ChatRequest { prompt, context };
        Ok(self.backend.call("gemini-chat", &request).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use url::Url;
    use verse_core::OrderStatus;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> AdvisorClient {
        let base = Url::parse(&server.uri()).unwrap();
        AdvisorClient::new(BackendClient::new(&base, Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn test_size_recommendation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/size-recommend"))
            .and(body_json(json!({
                "height": 175.0,
                "weight": 70.0,
                "bodyType": "regular",
                "fitPreference": "slim"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "size": "S",
                "alternatives": ["XS", "M"],
                "confidence": 0.9,
                "reasoning": "A slim fit suits your frame.",
                "bmi": 22.9
            })))
            .expect(1)
            .mount(&server)
            .await;

        let query = SizeQuery {
            height_cm: 175.0,
            weight_kg: 70.0,
            body_type: BodyType::Regular,
            fit_preference: FitPreference::Slim,
        };
        let recommendation = client(&server).size_recommendation(&query).await.unwrap();
        assert_eq!(recommendation.size, "S");
        assert_eq!(recommendation.alternatives, vec!["XS", "M"]);
        assert_eq!(recommendation.bmi, Some(22.9));
    }

    #[tokio::test]
    async fn test_size_recommendation_rejects_zero_height() {
        let server = MockServer::start().await;
        let query = SizeQuery {
            height_cm: 0.0,
            weight_kg: 70.0,
            body_type: BodyType::Regular,
            fit_preference: FitPreference::Regular,
        };
        let err = client(&server).size_recommendation(&query).await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_style_advice_surfaces_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/style-chat"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "model overloaded", "success": false})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .style_advice("What goes with olive chinos?", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::Backend(BackendError::Api { ref message, .. }) if message == "model overloaded"
        ));
    }

    #[tokio::test]
    async fn test_style_advice_sends_product_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/style-chat"))
            .and(body_json(json!({
                "question": "Office or weekend?",
                "productContext": {"title": "Linen Shirt", "fabric": "linen"}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"response": "Both, with the sleeves rolled.", "success": true})),
            )
            .mount(&server)
            .await;

        let product = ProductContext {
            title: Some("Linen Shirt".to_string()),
            fabric: Some("linen".to_string()),
            ..ProductContext::default()
        };
        let advice = client(&server)
            .style_advice("  Office or weekend?  ", Some(&product))
            .await
            .unwrap();
        assert_eq!(advice, "Both, with the sleeves rolled.");
    }

    #[tokio::test]
    async fn test_track_order_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/track-order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "found": true,
                "orderId": "VERSE002",
                "status": "delivered",
                "estimatedDelivery": "2025-12-09",
                "timeline": [
                    {"status": "Delivered", "date": "2025-12-09", "location": "Customer Address"}
                ],
                "naturalLanguageUpdate": "Delivered on the 9th."
            })))
            .mount(&server)
            .await;

        let result = client(&server).track_order("verse002", "").await.unwrap();
        let TrackingResult::Found(tracking) = result else {
            panic!("expected a found order");
        };
        assert_eq!(tracking.status, OrderStatus::Delivered);
        assert!(tracking.status.is_terminal());
    }

    #[tokio::test]
    async fn test_track_order_not_found_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/track-order"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "found": false,
                "message": "Order not found. Please check your order ID or contact support.",
                "suggestion": "Try VERSE001."
            })))
            .mount(&server)
            .await;

        let result = client(&server).track_order("NOPE", "").await.unwrap();
        assert_eq!(
            result,
            TrackingResult::NotFound {
                message: "Order not found. Please check your order ID or contact support."
                    .to_string(),
                suggestion: Some("Try VERSE001.".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_track_order_requires_an_identifier() {
        let server = MockServer::start().await;
        let err = client(&server).track_order(" ", "").await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/gemini-chat"))
            .and(body_json(json!({"prompt": "Hi", "context": {"page": "home"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": "Hello!",
                "confidence": 0.85,
                "success": true
            })))
            .mount(&server)
            .await;

        let reply = client(&server)
            .chat("Hi", Some(&json!({"page": "home"})))
            .await
            .unwrap();
        assert_eq!(reply.response, "Hello!");
        assert!(reply.success);
    }
}
