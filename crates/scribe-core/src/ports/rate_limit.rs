//! Rate limiting port for the credential endpoints.

use async_trait::async_trait;
use std::time::Duration;

/// Admission control keyed by client (the HTTP layer uses the peer IP).
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request against `key` and decide whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitDecision, RateLimitError>;
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// Over the limit; the next request may succeed after `retry_after`.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limiter backend unavailable: {0}")]
    Backend(String),
}
