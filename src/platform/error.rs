// ABOUTME: External delivery platform error types with SNAFU pattern.
// ABOUTME: Separates HTTP status failures from transport failures for programmatic handling.

use snafu::Snafu;

/// Error from a call to the external template store.
///
/// The client performs no retries; callers decide what a failure means
/// (the orchestrator records it per item, the rollback manager counts it).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExternalApiError {
    /// The platform answered with a non-2xx status.
    #[snafu(display("API request failed with status {status}: {body}"))]
    Status { status: u16, body: String },

    /// The request never completed (DNS, connect, timeout, TLS).
    #[snafu(display("transport error: {source}"))]
    Transport { source: reqwest::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401/403 from the platform.
    Unauthorized,
    /// 404 from the platform.
    NotFound,
    /// 429 from the platform.
    RateLimited,
    /// Any 5xx from the platform.
    Server,
    /// Other non-2xx status.
    Rejected,
    /// Request did not complete.
    Transport,
}

impl ExternalApiError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ExternalApiError::Status { status, .. } => match status {
                401 | 403 => ApiErrorKind::Unauthorized,
                404 => ApiErrorKind::NotFound,
                429 => ApiErrorKind::RateLimited,
                500..=599 => ApiErrorKind::Server,
                _ => ApiErrorKind::Rejected,
            },
            ExternalApiError::Transport { .. } => ApiErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for ExternalApiError {
    fn from(source: reqwest::Error) -> Self {
        ExternalApiError::Transport { source }
    }
}
