//! Request and response types for the AI advisory endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use verse_core::{OrderId, OrderStatus};

/// Body shape used to adjust the size estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Slim,
    #[default]
    Regular,
    Broad,
}

/// How the customer likes shirts to fit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPreference {
    Slim,
    #[default]
    Regular,
    Relaxed,
}

impl BodyType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slim => "slim",
            Self::Regular => "regular",
            Self::Broad => "broad",
        }
    }
}

impl FitPreference {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slim => "slim",
            Self::Regular => "regular",
            Self::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`BodyType`] or [`FitPreference`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for BodyType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slim" => Ok(Self::Slim),
            "regular" => Ok(Self::Regular),
            "broad" => Ok(Self::Broad),
            _ => Err(UnknownOption {
                kind: "body type",
                value: s.to_string(),
                expected: "slim, regular, broad",
            }),
        }
    }
}

impl FromStr for FitPreference {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slim" => Ok(Self::Slim),
            "regular" => Ok(Self::Regular),
            "relaxed" => Ok(Self::Relaxed),
            _ => Err(UnknownOption {
                kind: "fit preference",
                value: s.to_string(),
                expected: "slim, regular, relaxed",
            }),
        }
    }
}

// =============================================================================
// Size recommendation
// =============================================================================

/// Measurements submitted for a size recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeQuery {
    /// Height in centimetres.
    #[serde(rename = "height")]
    pub height_cm: f64,
    /// Weight in kilograms.
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    pub body_type: BodyType,
    pub fit_preference: FitPreference,
}

/// Recommended size with alternatives and the advisor's reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeRecommendation {
    pub size: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Between 0 and 1.
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub bmi: Option<f64>,
}

// =============================================================================
// Style advice and chat
// =============================================================================

/// Product the style question is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StyleChatRequest<'a> {
    pub question: &'a str,
    pub product_context: Option<&'a ProductContext>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StyleChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub prompt: &'a str,
    pub context: Option<&'a serde_json::Value>,
}

/// Free-form chat answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub success: bool,
}

// =============================================================================
// Order tracking
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TrackOrderRequest<'a> {
    pub order_id: &'a str,
    pub phone: &'a str,
}

/// One step in an order's shipping history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub status: String,
    pub date: String,
    pub location: String,
}

/// A located order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTracking {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub estimated_delivery: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub natural_language_update: Option<String>,
}

/// Outcome of an order lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingResult {
    Found(OrderTracking),
    NotFound {
        message: String,
        suggestion: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotFoundBody {
    pub message: Option<String>,
    pub suggestion: Option<String>,
}
