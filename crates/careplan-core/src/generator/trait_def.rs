//! The `PlanGenerator` trait -- the adapter interface for whatever produces
//! raw plan text from a patient report.
//!
//! The trait is object-safe so callers can hold `&dyn PlanGenerator` and
//! swap the hosted client for a canned one in tests.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a generation request.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("missing content in response")]
    MissingContent,

    #[error("API key not configured")]
    MissingApiKey,
}

impl GenerateError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::MissingContent | Self::MissingApiKey => false,
        }
    }
}

/// Produces raw plan text for a patient report.
///
/// The returned text is unprocessed: it may contain reasoning spans,
/// preamble, and banned sections.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Human-readable name for logs (e.g. the model name).
    fn name(&self) -> &str;

    /// Generate a plan for `report`.
    async fn generate(&self, report: &str) -> Result<String, GenerateError>;
}

// Compile-time assertion: PlanGenerator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn PlanGenerator) {}
};
