use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use revoker_auth::{AuthorizationHeader, BEARER_PREFIX};
use revoker_core::current_iso8601_timestamp;
use serde_json::Value;

use crate::error::RevocationError;
use crate::types::RevocationResult;

/// Okta's native API-token scheme, used in place of `Bearer`.
pub const SSWS_PREFIX: &str = "SSWS ";

/// Rewrites a `Bearer` header into the `SSWS` scheme the identity provider expects.
///
/// Headers already using `SSWS`, and non-bearer schemes such as `Basic`, are
/// returned unchanged.
pub fn native_authorization_value(header: &AuthorizationHeader) -> String {
    let raw = header.as_str();
    if raw.starts_with(SSWS_PREFIX) {
        return raw.to_string();
    }
    match raw.strip_prefix(BEARER_PREFIX) {
        Some(token) if token.starts_with(SSWS_PREFIX) => token.to_string(),
        _ => header
            .with_bearer_scheme_replaced(SSWS_PREFIX)
            .as_str()
            .to_string(),
    }
}

/// `{base_url}/api/v1/users/{user_id}/sessions` with the user id percent-encoded.
pub fn sessions_url(base_url: &str, user_id: &str) -> String {
    format!(
        "{}/api/v1/users/{}/sessions",
        base_url.trim_end_matches('/'),
        urlencoding::encode(user_id)
    )
}

pub fn validate_user_id(user_id: Option<&str>) -> Result<&str, RevocationError> {
    match user_id.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RevocationError::Validation(
            "userId is required and must be a non-empty string".to_string(),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything needed for one DELETE call. Built fresh per attempt.
pub struct RequestDescriptor {
    user_id: String,
    base_url: String,
    authorization: AuthorizationHeader,
}

impl RequestDescriptor {
    pub fn new(
        user_id: &str,
        base_url: impl Into<String>,
        authorization: AuthorizationHeader,
    ) -> Result<Self, RevocationError> {
        let user_id = validate_user_id(Some(user_id))?.to_string();
        Ok(Self {
            user_id,
            base_url: base_url.into(),
            authorization,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn authorization(&self) -> &AuthorizationHeader {
        &self.authorization
    }

    pub fn url(&self) -> String {
        sessions_url(&self.base_url, &self.user_id)
    }
}

fn generic_failure_message(status: u16) -> String {
    format!("Failed to revoke sessions: HTTP {status}")
}

fn error_summary_from_body(raw: &str) -> Option<String> {
    let payload = serde_json::from_str::<Value>(raw).ok()?;
    payload
        .get("errorSummary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|summary| !summary.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
/// Issues the session revocation DELETE and classifies its response.
/// The request timeout is whatever the supplied client was built with.
pub struct SessionRevoker {
    client: reqwest::Client,
}

impl SessionRevoker {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Performs exactly one network call.
    ///
    /// Any 2xx (normally 204) is success and the body is ignored. Other
    /// statuses become [`RevocationError::Http`], using the provider's
    /// `errorSummary` when the body carries one. Transport failures drop the
    /// request URL, which embeds the user id.
    pub async fn invoke(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<RevocationResult, RevocationError> {
        let mut authorization = HeaderValue::from_str(&native_authorization_value(
            descriptor.authorization(),
        ))
        .map_err(|_| {
            RevocationError::Configuration(
                "authorization credential contains characters not allowed in an HTTP header"
                    .to_string(),
            )
        })?;
        authorization.set_sensitive(true);

        let response = self
            .client
            .delete(descriptor.url())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|error| RevocationError::Transport(error.without_url()))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                user_id = descriptor.user_id(),
                base_url = descriptor.base_url(),
                status = status.as_u16(),
                "revoked user sessions"
            );
            return Ok(RevocationResult {
                user_id: descriptor.user_id().to_string(),
                sessions_revoked: true,
                address: descriptor.base_url().to_string(),
                revoked_at: current_iso8601_timestamp(),
                recovery_method: None,
            });
        }

        // A body that fails to read or parse must not mask the status code.
        let message = response
            .text()
            .await
            .ok()
            .and_then(|raw| error_summary_from_body(&raw))
            .unwrap_or_else(|| generic_failure_message(status.as_u16()));
        tracing::debug!(
            user_id = descriptor.user_id(),
            status = status.as_u16(),
            "session revocation rejected"
        );
        Err(RevocationError::Http {
            status_code: status.as_u16(),
            message,
        })
    }
}
