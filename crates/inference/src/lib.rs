//! Client for the DashScope generation API.
//!
//! Two entry points share one HTTP client:
//!
//! - [`DashScopeClient::analyze_video`]: multimodal model, instruction plus a
//!   video URL attachment.
//! - [`DashScopeClient::analyze_text`]: text-only model, used as the degraded
//!   path when the multimodal call fails.
//!
//! Both return the model's message text verbatim; parsing happens elsewhere.

use std::time::Duration;

pub mod client;
pub mod config;
pub mod messages;

pub use client::DashScopeClient;
pub use config::InferenceConfig;

/// Errors from the inference layer.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// No API key configured. Raised before any network call.
    #[error("Inference API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The call exceeded the per-request ceiling.
    #[error("Inference request timed out after {0:?}")]
    Timeout(Duration),

    /// The service returned a non-2xx status code.
    #[error("Inference API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response without a usable message.
    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

impl InferenceError {
    /// Whether this error came from the remote service rather than local
    /// configuration. Upstream errors are eligible for fallback.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::MissingApiKey)
    }
}
