//! Upstream failure taxonomy shared by the gateway and its callers

use thiserror::Error;

/// Ways a call to the external generation API can fail.
///
/// These are recovered per-item in bulk and streaming modes; only the
/// single-item endpoint surfaces them as a request failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("service unavailable")]
    ServiceUnavailable,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
