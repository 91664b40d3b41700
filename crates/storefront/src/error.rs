//! Unified error handling with Sentry integration.
//!
//! Every fallible operation in the crate returns its own error type; callers
//! that drive several of them (the CLI) convert into [`AppError`], which knows
//! which failures are worth reporting and how to describe them to a customer.

use thiserror::Error;

use crate::advisor::AdvisorError;
use crate::backend::BackendError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::shopify::ShopifyError;
use crate::storage::StorageError;
use crate::tryon::TryOnError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be read or written.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Backend call failed outside a more specific client.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Size, style, chat or tracking request failed.
    #[error("Advisor error: {0}")]
    Advisor(#[from] AdvisorError),

    /// Checkout could not proceed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Virtual try-on failed.
    #[error("Try-on error: {0}")]
    TryOn(#[from] TryOnError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this failure is ours (or an upstream's) rather than the user's.
    ///
    /// Server errors are reported to Sentry and shown with a generic message.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Storage(_)
            | Self::Cart(_)
            | Self::Shopify(_)
            | Self::Backend(_)
            | Self::Internal(_) => true,
            Self::Advisor(AdvisorError::Backend(_))
            | Self::Checkout(CheckoutError::Backend(_)) => true,
            Self::TryOn(e) => matches!(
                e,
                TryOnError::Backend(_) | TryOnError::Failed { .. } | TryOnError::InvalidMedia(_)
            ),
            _ => false,
        }
    }

    /// Message safe to show a customer.
    ///
    /// Internal details are never exposed for server errors.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Cart(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
            Self::Shopify(_) => "The product catalog is unavailable right now.".to_string(),
            Self::Backend(e)
            | Self::Advisor(AdvisorError::Backend(e))
            | Self::Checkout(CheckoutError::Backend(e))
            | Self::TryOn(TryOnError::Backend(e)) => {
                if e.is_timeout() {
                    "The service took too long to respond. Please try again.".to_string()
                } else {
                    "External service error. Please try again later.".to_string()
                }
            }
            Self::TryOn(TryOnError::Failed { .. } | TryOnError::InvalidMedia(_)) => {
                "Try-on failed. Please try again with different images.".to_string()
            }
            Self::TryOn(e) => match e.hint() {
                Some(hint) => format!("{e} {hint}"),
                None => e.to_string(),
            },
            Self::Advisor(e) => e.to_string(),
            Self::Checkout(e) => e.to_string(),
            Self::Config(e) => e.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Report server errors to Sentry and log them. Returns the event ID if
    /// one was captured.
    pub fn capture(&self) -> Option<sentry::types::Uuid> {
        if !self.is_server_error() {
            tracing::debug!(error = %self, "Client error");
            return None;
        }
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Command error"
        );
        Some(event_id)
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "gid://shopify/Product/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    fn api_error() -> BackendError {
        BackendError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "db connection refused at 10.0.0.3".to_string(),
        }
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product linen-shirt".to_string());
        assert_eq!(err.to_string(), "Not found: product linen-shirt");

        let err = AppError::BadRequest("quantity must be a number".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity must be a number");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::from(api_error());
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("10.0.0.3"));

        let err = AppError::from(CheckoutError::Backend(api_error()));
        assert!(err.is_server_error());
        assert!(!err.user_message().contains("db connection"));
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = AppError::from(CheckoutError::EmptyCart);
        assert!(!err.is_server_error());
        assert_eq!(err.user_message(), "your cart is empty");

        let err = AppError::from(AdvisorError::InvalidInput("height must be positive".into()));
        assert!(!err.is_server_error());
        assert!(err.user_message().contains("height must be positive"));
    }

    #[test]
    fn test_try_on_hint_is_appended() {
        let err = AppError::from(TryOnError::QuotaExceeded {
            message: "GPU quota exceeded.".to_string(),
            details: Some("Resets in 1 hour.".to_string()),
        });
        assert!(!err.is_server_error());
        assert_eq!(err.user_message(), "GPU quota exceeded. Resets in 1 hour.");
    }

    #[test]
    fn test_client_errors_are_not_captured() {
        assert!(AppError::NotFound("x".to_string()).capture().is_none());
    }
}
