use std::sync::Arc;

use async_trait::async_trait;
use revoker_auth::{CredentialResolver, TokenCache};
use tokio::time::sleep;

use crate::error::RevocationError;
use crate::halt::{halt, UNKNOWN_USER};
use crate::invoker::{validate_user_id, RequestDescriptor, SessionRevoker};
use crate::recovery::{classify_error, unrecoverable_error};
use crate::settings::{RecoveryMode, RevocationSettings};
use crate::target::resolve_base_url;
use crate::types::{HaltParams, HaltResult, JobContext, JobParams, RevocationResult};

#[async_trait]
/// Lifecycle entry points consumed by the external job framework.
///
/// The framework never runs two of these concurrently for the same job run.
pub trait JobHandler: Send + Sync {
    async fn execute(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<RevocationResult, RevocationError>;

    /// Called with the error a previous `execute` returned. Takes ownership so
    /// the original error can be handed back unchanged.
    async fn recover(
        &self,
        params: &JobParams,
        ctx: &JobContext,
        error: RevocationError,
    ) -> Result<RevocationResult, RevocationError>;

    fn halt(&self, params: &HaltParams) -> HaltResult;
}

#[derive(Debug, Clone)]
/// Revokes every active session of one user per invocation.
pub struct SessionRevocationJob {
    credentials: CredentialResolver,
    revoker: SessionRevoker,
}

impl SessionRevocationJob {
    pub fn new(request_timeout_ms: u64) -> Result<Self, RevocationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms.max(1)))
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Shares `client` between the token exchange and the revocation call.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            credentials: CredentialResolver::with_client(client.clone()),
            revoker: SessionRevoker::new(client),
        }
    }

    pub fn from_settings(settings: &RevocationSettings) -> Result<Self, RevocationError> {
        Self::new(settings.request_timeout_ms)
    }

    pub fn with_token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.credentials = self.credentials.with_token_cache(cache);
        self
    }

    /// Resolves target and credentials from scratch, then issues one DELETE.
    async fn attempt(
        &self,
        user_id: &str,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<RevocationResult, RevocationError> {
        let base_url = resolve_base_url(params, &ctx.environment)?;
        let authorization = self
            .credentials
            .resolve(&ctx.secrets, &ctx.environment)
            .await?;
        let descriptor = RequestDescriptor::new(user_id, base_url, authorization)?;
        self.revoker.invoke(&descriptor).await
    }
}

#[async_trait]
impl JobHandler for SessionRevocationJob {
    async fn execute(
        &self,
        params: &JobParams,
        ctx: &JobContext,
    ) -> Result<RevocationResult, RevocationError> {
        let user_id = validate_user_id(params.user_id.as_deref())?;
        self.attempt(user_id, params, ctx).await
    }

    async fn recover(
        &self,
        params: &JobParams,
        ctx: &JobContext,
        error: RevocationError,
    ) -> Result<RevocationResult, RevocationError> {
        // Configuration, validation and token failures are surfaced as-is.
        if !error.is_revocation_failure() {
            return Err(error);
        }

        let settings = RevocationSettings::from_env(&ctx.environment);
        if settings.recovery_mode == RecoveryMode::Framework {
            tracing::debug!(
                status = error.status_code(),
                "delegating retry to the job framework"
            );
            return Err(error);
        }

        let Ok(user_id) = validate_user_id(params.user_id.as_deref()) else {
            return Err(unrecoverable_error(UNKNOWN_USER, &error));
        };
        let class = classify_error(&error);
        let Some(plan) = class.retry_plan(&settings.backoff) else {
            tracing::warn!(
                user_id,
                status = error.status_code(),
                class = class.as_str(),
                "unrecoverable session revocation failure"
            );
            return Err(unrecoverable_error(user_id, &error));
        };

        tracing::warn!(
            user_id,
            status = error.status_code(),
            class = class.as_str(),
            backoff_ms = u64::try_from(plan.delay.as_millis()).unwrap_or(u64::MAX),
            "retrying session revocation once after backoff"
        );
        sleep(plan.delay).await;

        match self.attempt(user_id, params, ctx).await {
            Ok(mut result) => {
                result.recovery_method = Some(plan.method);
                tracing::info!(
                    user_id,
                    recovery_method = plan.method.as_str(),
                    "session revocation recovered"
                );
                Ok(result)
            }
            Err(retry_error) => {
                tracing::warn!(
                    user_id,
                    retry_status = retry_error.status_code(),
                    retry_kind = retry_error.kind(),
                    "session revocation retry failed"
                );
                Err(unrecoverable_error(user_id, &error))
            }
        }
    }

    fn halt(&self, params: &HaltParams) -> HaltResult {
        halt(params)
    }
}
