use revoker_core::ConfigBundle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Parameters the framework passes to `execute` and `recover`.
pub struct JobParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub okta_domain: Option<String>,
}

impl JobParams {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Parameters the framework passes to `halt`.
pub struct HaltParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Secret and environment bundles supplied for one invocation.
pub struct JobContext {
    pub secrets: ConfigBundle,
    pub environment: ConfigBundle,
}

impl JobContext {
    pub fn new(secrets: ConfigBundle, environment: ConfigBundle) -> Self {
        Self {
            secrets,
            environment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// How a failed revocation was eventually recovered.
pub enum RecoveryMethod {
    RateLimitRetry,
    ServiceRetry,
}

impl RecoveryMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimitRetry => "rate_limit_retry",
            Self::ServiceRetry => "service_retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Successful outcome reported back to the framework.
pub struct RevocationResult {
    pub user_id: String,
    pub sessions_revoked: bool,
    pub address: String,
    pub revoked_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_method: Option<RecoveryMethod>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Acknowledgment returned by `halt`.
pub struct HaltResult {
    pub user_id: String,
    pub reason: String,
    pub halted_at: String,
    pub cleanup_completed: bool,
}
