use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use httpmock::prelude::*;
use revoker_auth::{CachedToken, InMemoryTokenCache, TokenCache};
use revoker_core::ConfigBundle;
use revoker_okta::{
    HaltParams, JobContext, JobHandler, JobParams, RecoveryMethod, RevocationError,
    RevocationResult, SessionRevocationJob,
};
use serde_json::json;

/// Counts cache traffic while delegating storage to the in-memory cache.
struct RecordingTokenCache {
    inner: InMemoryTokenCache,
    hits: AtomicUsize,
    puts: AtomicUsize,
}

impl RecordingTokenCache {
    fn new() -> Self {
        Self {
            inner: InMemoryTokenCache::new(),
            hits: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }
    }
}

impl TokenCache for RecordingTokenCache {
    fn get(&self, key: &str) -> Option<CachedToken> {
        let cached = self.inner.get(key);
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        cached
    }

    fn put(&self, key: &str, token: CachedToken) {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, token);
    }
}

/// Drives a handler the way the job framework does: one execute, then recover on failure.
async fn run_job(
    handler: &dyn JobHandler,
    params: &JobParams,
    ctx: &JobContext,
) -> Result<RevocationResult, RevocationError> {
    match handler.execute(params, ctx).await {
        Ok(result) => Ok(result),
        Err(error) => handler.recover(params, ctx, error).await,
    }
}

fn client_credentials_context(server: &MockServer) -> JobContext {
    let secrets =
        ConfigBundle::new().with("OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET", "client-secret");
    let environment = ConfigBundle::new()
        .with("ADDRESS", server.base_url())
        .with(
            "OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL",
            server.url("/oauth2/v1/token"),
        )
        .with("OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID", "client-1")
        .with("OAUTH2_CLIENT_CREDENTIALS_SCOPE", "okta.users.manage")
        .with("SERVICE_ERROR_BACKOFF_MS", "1")
        .with("RATE_LIMIT_BACKOFF_MS", "1");
    JobContext::new(secrets, environment)
}

#[tokio::test]
async fn integration_cached_client_credentials_token_survives_retry() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method(POST).path("/oauth2/v1/token");
        then.status(200).json_body(json!({
            "access_token": "exchanged-1",
            "token_type": "Bearer",
            "expires_in": 3600
        }));
    });
    let mut unavailable = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/users/00u1abcd/sessions");
        then.status(503)
            .json_body(json!({"errorSummary": "Service unavailable"}));
    });

    let cache = Arc::new(RecordingTokenCache::new());
    let job = SessionRevocationJob::new(5_000)
        .expect("job should build")
        .with_token_cache(cache.clone());
    let params = JobParams::for_user("00u1abcd");
    let ctx = client_credentials_context(&server);

    let error = job
        .execute(&params, &ctx)
        .await
        .expect_err("first attempt should hit 503");
    assert_eq!(error.status_code(), Some(503));
    unavailable.assert_calls(1);
    unavailable.delete();

    let revoked = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/v1/users/00u1abcd/sessions")
            .header("authorization", "SSWS exchanged-1");
        then.status(204);
    });

    let result = job
        .recover(&params, &ctx, error)
        .await
        .expect("retry should succeed");
    assert!(result.sessions_revoked);
    assert_eq!(result.recovery_method, Some(RecoveryMethod::ServiceRetry));
    revoked.assert_calls(1);
    token.assert_calls(1);
    assert_eq!(cache.puts.load(Ordering::SeqCst), 1);
    assert_eq!(cache.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn integration_framework_driver_reports_recovery_error_after_two_calls() {
    let server = MockServer::start();
    let rate_limited = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/users/00u1abcd/sessions");
        then.status(429)
            .json_body(json!({"errorSummary": "API call exceeded rate limit"}));
    });

    let job = SessionRevocationJob::new(5_000).expect("job should build");
    let secrets = ConfigBundle::new().with("BEARER_AUTH_TOKEN", "token-1");
    let environment = ConfigBundle::new()
        .with("ADDRESS", server.base_url())
        .with("RATE_LIMIT_BACKOFF_MS", "1");
    let ctx = JobContext::new(secrets, environment);

    let error = run_job(&job, &JobParams::for_user("00u1abcd"), &ctx)
        .await
        .expect_err("repeated 429 should escalate");
    assert_eq!(error.kind(), "recovery_error");
    assert_eq!(error.status_code(), Some(429));
    assert_eq!(
        error.to_string(),
        "Unrecoverable error revoking sessions for user 00u1abcd: API call exceeded rate limit"
    );
    assert!(!error.to_string().contains("token-1"));
    rate_limited.assert_calls(2);
}

#[tokio::test]
async fn integration_framework_driver_halts_without_network() {
    let server = MockServer::start();
    let any_request = server.mock(|_when, then| {
        then.status(204);
    });

    let job = SessionRevocationJob::new(5_000).expect("job should build");
    let handler: &dyn JobHandler = &job;
    let result = handler.halt(&HaltParams {
        user_id: Some("00u1abcd".to_string()),
        reason: None,
    });

    assert_eq!(result.user_id, "00u1abcd");
    assert_eq!(result.reason, "unspecified");
    assert!(result.cleanup_completed);
    any_request.assert_calls(0);
}
