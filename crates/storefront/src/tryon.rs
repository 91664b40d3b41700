//! Virtual try-on client.
//!
//! Uploads a photo of the customer and a garment image, and receives the
//! generated result (and optionally a short video) as base64 data URLs.
//! Generation is slow, so this client carries its own, longer timeout.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::backend::{BackendClient, BackendError, ErrorBody};
use crate::shopify::Product;

/// Description sent when the caller gives none.
pub const DEFAULT_DESCRIPTION: &str = "Stylish outfit";

/// Description for a garment photo supplied by the customer.
pub const CUSTOM_GARMENT_DESCRIPTION: &str = "Custom garment";

static DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+);base64,(.*)$").expect("valid regex")
});

/// Errors from the try-on service.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// The model took too long to respond.
    #[error("{message}")]
    Timeout {
        message: String,
        suggestion: Option<String>,
    },

    /// The model's usage quota is exhausted.
    #[error("{message}")]
    QuotaExceeded {
        message: String,
        details: Option<String>,
    },

    /// The model is down or overloaded.
    #[error("{message}")]
    Unavailable {
        message: String,
        suggestion: Option<String>,
    },

    /// The backend rejected the request or failed to generate.
    #[error("try-on failed ({status}): {message}")]
    Failed {
        status: StatusCode,
        message: String,
    },

    /// The product has no image to use as the garment.
    #[error("product '{0}' has no image to try on")]
    NoGarmentImage(String),

    /// The response did not contain a usable image.
    #[error("invalid media in response: {0}")]
    InvalidMedia(String),

    /// Base64 payload did not decode.
    #[error("failed to decode media: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Reading an input image failed.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Transport or parse failure.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl TryOnError {
    /// Extra guidance from the backend, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Timeout { suggestion, .. } | Self::Unavailable { suggestion, .. } => {
                suggestion.as_deref()
            }
            Self::QuotaExceeded { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TryOnError {
    fn from(error: reqwest::Error) -> Self {
        Self::Backend(BackendError::Http(error))
    }
}

/// An image to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl TryOnImage {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing its type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::Io`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, TryOnError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for_extension(path.extension().and_then(|e| e.to_str()));
        Ok(Self::new(file_name, mime, bytes))
    }

    fn into_part(self) -> Result<Part, TryOnError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}

fn mime_for_extension(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// A try-on submission.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub person_image: TryOnImage,
    pub garment_image: TryOnImage,
    /// Garment description passed to the model.
    pub description: String,
    /// Also render a short turnaround video.
    pub generate_video: bool,
}

/// Decoded media returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Media {
    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::InvalidMedia`] if `url` is not a base64 data URL
    /// and [`TryOnError::Decode`] if the payload is not valid base64.
    pub fn from_data_url(url: &str) -> Result<Self, TryOnError> {
        let captures = DATA_URL
            .captures(url.trim())
            .ok_or_else(|| TryOnError::InvalidMedia("expected a base64 data URL".to_string()))?;
        let mime = captures[1].to_ascii_lowercase();
        let bytes = STANDARD.decode(&captures[2])?;
        Ok(Self { mime, bytes })
    }

    /// File extension for the media type.
    #[must_use]
    pub fn extension(&self) -> &str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "video/mp4" => "mp4",
            other => other.rsplit('/').next().unwrap_or("bin"),
        }
    }
}

/// Result of a try-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnResult {
    pub image: Media,
    pub video: Option<Media>,
}

#[derive(Debug, Deserialize)]
struct TryOnResponse {
    image: Option<String>,
    video: Option<String>,
}

/// Client for the try-on endpoint.
#[derive(Debug, Clone)]
pub struct TryOnClient {
    backend: BackendClient,
}

impl TryOnClient {
    /// Create a client with its own `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, TryOnError> {
        Ok(Self {
            backend: BackendClient::new(base_url, timeout)?,
        })
    }

    /// Download a product's first image to use as the garment.
    ///
    /// # Errors
    ///
    /// Returns [`TryOnError::NoGarmentImage`] if the product has no image, or
    /// a transport error if the download fails.
    #[instrument(skip(self, product), fields(handle = %product.handle))]
    pub async fn garment_from_product(&self, product: &Product) -> Result<TryOnImage, TryOnError> {
        let image = product
            .featured_image()
            .ok_or_else(|| TryOnError::NoGarmentImage(product.handle.clone()))?;

        let response = self
            .backend
            .http()
            .get(&image.url)
            .send()
            .await?
            .error_for_status()?;
        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        debug!(size = bytes.len(), mime = %mime, "Downloaded garment image");

        Ok(TryOnImage::new("product.jpg", mime, bytes))
    }

    /// Run a virtual try-on.
    ///
    /// # Errors
    ///
    /// Returns a typed error for timeouts (504), quota exhaustion (429) and
    /// unavailability (503), [`TryOnError::Failed`] for other backend
    /// failures, or a transport/decode error.
    #[instrument(skip(self, request), fields(video = request.generate_video))]
    pub async fn try_on(&self, request: TryOnRequest) -> Result<TryOnResult, TryOnError> {
        let description = if request.description.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            request.description
        };
        let form = Form::new()
            .part("person_image", request.person_image.into_part()?)
            .part("garment_image", request.garment_image.into_part()?)
            .text("description", description)
            .text(
                "generate_video",
                if request.generate_video { "true" } else { "false" },
            );

        let url = self.backend.endpoint("tryon")?;
        let response = match self.backend.http().post(url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(TryOnError::Timeout {
                    message: "The try-on took longer than expected.".to_string(),
                    suggestion: Some("Please try again in a few moments.".to_string()),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        let parsed: TryOnResponse = serde_json::from_str(&body).map_err(BackendError::from)?;
        let image = parsed
            .image
            .as_deref()
            .map(Media::from_data_url)
            .transpose()?
            .ok_or_else(|| TryOnError::InvalidMedia("response has no image".to_string()))?;
        let video = parsed
            .video
            .as_deref()
            .map(Media::from_data_url)
            .transpose()?;

        info!(
            image_bytes = image.bytes.len(),
            video = video.is_some(),
            "Try-on complete"
        );
        Ok(TryOnResult { image, video })
    }
}

fn classify_failure(status: StatusCode, body: &str) -> TryOnError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error
        .unwrap_or_else(|| body.chars().take(200).collect());
    tracing::warn!(status = %status, message = %message, "Try-on failed");

    match status {
        StatusCode::GATEWAY_TIMEOUT => TryOnError::Timeout {
            message,
            suggestion: parsed.suggestion.or(parsed.details),
        },
        StatusCode::TOO_MANY_REQUESTS => TryOnError::QuotaExceeded {
            message,
            details: parsed.details,
        },
        StatusCode::SERVICE_UNAVAILABLE => TryOnError::Unavailable {
            message,
            suggestion: parsed.suggestion.or(parsed.details),
        },
        _ => TryOnError::Failed { status, message },
    }
}
