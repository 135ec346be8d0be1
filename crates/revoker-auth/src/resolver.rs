//! Authentication method negotiation.
//!
//! Exactly one method is used per invocation. Resolution order is fixed and
//! first-match-wins: bearer token, basic credentials, pre-issued OAuth2 access
//! token, OAuth2 client credentials. Only the client-credentials method touches
//! the network.

use std::sync::Arc;

use revoker_core::ConfigBundle;

use crate::error::CredentialError;
use crate::oauth2::{client_credentials_config_from_env, exchange_client_credentials};
use crate::token_cache::{token_cache_key, CachedToken, TokenCache};
use crate::types::{
    AuthMethod, AuthorizationHeader, BASIC_PASSWORD, BASIC_USERNAME, BEARER_AUTH_TOKEN,
    OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN, OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET,
};

pub const NO_AUTHENTICATION_CONFIGURED: &str = "No authentication configured";

fn no_authentication_configured_message() -> String {
    format!(
        "{NO_AUTHENTICATION_CONFIGURED}. Provide one of: {BEARER_AUTH_TOKEN}, \
         {BASIC_USERNAME} + {BASIC_PASSWORD}, {OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN}, \
         {OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET}"
    )
}

/// Determines which authentication method the bundles configure.
///
/// Pure: no network access. Having several methods configured is fine; the
/// first one in resolution order wins.
pub fn configured_auth_method(
    secrets: &ConfigBundle,
    env: &ConfigBundle,
) -> Result<AuthMethod, CredentialError> {
    if let Some(token) = secrets.non_empty(BEARER_AUTH_TOKEN) {
        return Ok(AuthMethod::BearerToken {
            token: token.to_string(),
        });
    }

    if let (Some(username), Some(password)) = (
        secrets.non_empty(BASIC_USERNAME),
        secrets.non_empty(BASIC_PASSWORD),
    ) {
        return Ok(AuthMethod::BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    if let Some(token) = secrets.non_empty(OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN) {
        return Ok(AuthMethod::OAuth2AccessToken {
            token: token.to_string(),
        });
    }

    if let Some(client_secret) = secrets.non_empty(OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET) {
        let config = client_credentials_config_from_env(client_secret, env)?;
        return Ok(AuthMethod::OAuth2ClientCredentials(config));
    }

    Err(CredentialError::configuration(
        no_authentication_configured_message(),
    ))
}

#[derive(Clone)]
/// Turns secret/environment bundles into an `Authorization` header value.
///
/// Provider-agnostic: the header always uses the standard `Bearer` or `Basic`
/// schemes. Callers that need a native scheme rewrite it themselves.
pub struct CredentialResolver {
    client: reqwest::Client,
    token_cache: Option<Arc<dyn TokenCache>>,
}

impl CredentialResolver {
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            token_cache: None,
        }
    }

    /// Reuses client-credentials tokens across invocations until they expire.
    pub fn with_token_cache(mut self, cache: Arc<dyn TokenCache>) -> Self {
        self.token_cache = Some(cache);
        self
    }

    pub async fn resolve(
        &self,
        secrets: &ConfigBundle,
        env: &ConfigBundle,
    ) -> Result<AuthorizationHeader, CredentialError> {
        let method = configured_auth_method(secrets, env)?;
        tracing::debug!(auth_method = method.as_str(), "authentication method resolved");
        self.header_for(&method).await
    }

    pub async fn header_for(
        &self,
        method: &AuthMethod,
    ) -> Result<AuthorizationHeader, CredentialError> {
        match method {
            AuthMethod::BearerToken { token } | AuthMethod::OAuth2AccessToken { token } => {
                Ok(AuthorizationHeader::bearer(token))
            }
            AuthMethod::BasicAuth { username, password } => {
                Ok(AuthorizationHeader::basic(username, password))
            }
            AuthMethod::OAuth2ClientCredentials(config) => {
                let cache_key = token_cache_key(config);
                if let Some(cached) = self
                    .token_cache
                    .as_ref()
                    .and_then(|cache| cache.get(&cache_key))
                {
                    tracing::debug!(
                        token_url = config.token_url.as_str(),
                        "using cached oauth2 client-credentials token"
                    );
                    return Ok(AuthorizationHeader::bearer(&cached.access_token));
                }

                let token = exchange_client_credentials(&self.client, config).await?;
                if let (Some(cache), Some(expires_unix)) =
                    (self.token_cache.as_ref(), token.expires_unix)
                {
                    cache.put(
                        &cache_key,
                        CachedToken {
                            access_token: token.access_token.clone(),
                            expires_unix,
                        },
                    );
                }
                Ok(AuthorizationHeader::bearer(&token.access_token))
            }
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("token_cache", &self.token_cache.is_some())
            .finish()
    }
}
