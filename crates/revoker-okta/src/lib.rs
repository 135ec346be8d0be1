//! Okta user-session revocation job.
//!
//! Resolves the API target and credentials, issues the single
//! `DELETE /api/v1/users/{id}/sessions` call, and applies a one-shot
//! wait-and-retry policy for rate-limit and service-unavailable failures.

mod error;
mod halt;
mod invoker;
mod job;
mod recovery;
mod settings;
mod target;
mod types;

pub use error::RevocationError;
pub use halt::{halt, UNKNOWN_USER, UNSPECIFIED_REASON};
pub use invoker::{
    native_authorization_value, sessions_url, validate_user_id, RequestDescriptor,
    SessionRevoker, SSWS_PREFIX,
};
pub use job::{JobHandler, SessionRevocationJob};
pub use recovery::{
    classify_error, classify_failure, unrecoverable_error, FailureClass, RetryPlan,
};
pub use settings::*;
pub use target::{resolve_base_url, ADDRESS, NO_URL_SPECIFIED};
pub use types::*;
