//! Transient-failure classification for the single-retry recovery path.
//!
//! `Failed(status) -> RetryPending | Unrecoverable`. A retry is attempted at
//! most once; whatever happens to that retry is never re-classified.

use std::time::Duration;

use crate::error::RevocationError;
use crate::settings::BackoffConfig;
use crate::types::RecoveryMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    RateLimit,
    ServiceUnavailable,
    Unrecoverable,
}

impl FailureClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Unrecoverable => "unrecoverable",
        }
    }

    /// The wait and result tag for a retryable class; `None` means escalate.
    pub fn retry_plan(self, backoff: &BackoffConfig) -> Option<RetryPlan> {
        match self {
            Self::RateLimit => Some(RetryPlan {
                delay: backoff.rate_limit,
                method: RecoveryMethod::RateLimitRetry,
            }),
            Self::ServiceUnavailable => Some(RetryPlan {
                delay: backoff.service_error,
                method: RecoveryMethod::ServiceRetry,
            }),
            Self::Unrecoverable => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPlan {
    pub delay: Duration,
    pub method: RecoveryMethod,
}

/// Classifies a rejected revocation call.
///
/// The `429` / `rate limit` substring match on the message is intentional and
/// applies to any status, so a 404 whose summary echoes a user id containing
/// `429` is still treated as a rate limit.
pub fn classify_failure(status_code: Option<u16>, message: &str) -> FailureClass {
    let lowered = message.to_ascii_lowercase();
    if status_code == Some(429) || lowered.contains("429") || lowered.contains("rate limit") {
        return FailureClass::RateLimit;
    }
    match status_code {
        Some(502..=504) => FailureClass::ServiceUnavailable,
        _ => FailureClass::Unrecoverable,
    }
}

/// Only HTTP rejections are eligible for a retry. Transport failures may have
/// reached the provider already and always escalate.
pub fn classify_error(error: &RevocationError) -> FailureClass {
    match error {
        RevocationError::Http {
            status_code,
            message,
        } => classify_failure(Some(*status_code), message),
        _ => FailureClass::Unrecoverable,
    }
}

/// Terminal error wrapping the original failure message and status.
pub fn unrecoverable_error(user_id: &str, original: &RevocationError) -> RevocationError {
    RevocationError::Recovery {
        status_code: original.status_code(),
        message: format!("Unrecoverable error revoking sessions for user {user_id}: {original}"),
    }
}
