use std::collections::BTreeMap;

use revoker_core::{current_unix_timestamp, ConfigBundle};
use serde_json::Value;

use crate::error::CredentialError;
use crate::types::{
    AuthStyle, OAuth2ClientCredentialsConfig, OAUTH2_CLIENT_CREDENTIALS_AUDIENCE,
    OAUTH2_CLIENT_CREDENTIALS_AUTH_STYLE, OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID,
    OAUTH2_CLIENT_CREDENTIALS_SCOPE, OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL,
};

#[derive(Clone, PartialEq, Eq)]
/// Access token returned by a successful client-credentials exchange.
pub struct ExchangedToken {
    pub access_token: String,
    pub expires_unix: Option<u64>,
}

impl std::fmt::Debug for ExchangedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangedToken")
            .field("access_token", &"<redacted>")
            .field("expires_unix", &self.expires_unix)
            .finish()
    }
}

/// Reads the client-credentials settings that accompany a client secret.
///
/// The token URL and client id are mandatory; scope, audience and auth style
/// are optional.
pub fn client_credentials_config_from_env(
    client_secret: &str,
    env: &ConfigBundle,
) -> Result<OAuth2ClientCredentialsConfig, CredentialError> {
    let token_url = env.non_empty(OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL);
    let client_id = env.non_empty(OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID);
    let (Some(token_url), Some(client_id)) = (token_url, client_id) else {
        return Err(CredentialError::configuration(format!(
            "OAuth2 client credentials require {OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL} and \
             {OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID} in the environment"
        )));
    };

    Ok(OAuth2ClientCredentialsConfig {
        token_url: token_url.to_string(),
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        scope: env
            .non_empty(OAUTH2_CLIENT_CREDENTIALS_SCOPE)
            .map(str::to_string),
        audience: env
            .non_empty(OAUTH2_CLIENT_CREDENTIALS_AUDIENCE)
            .map(str::to_string),
        auth_style: AuthStyle::parse(env.non_empty(OAUTH2_CLIENT_CREDENTIALS_AUTH_STYLE)),
    })
}

fn client_credentials_form(config: &OAuth2ClientCredentialsConfig) -> BTreeMap<&'static str, &str> {
    let mut form = BTreeMap::new();
    form.insert("grant_type", "client_credentials");
    if let Some(scope) = config.scope.as_deref() {
        form.insert("scope", scope);
    }
    if let Some(audience) = config.audience.as_deref() {
        form.insert("audience", audience);
    }
    if config.auth_style == AuthStyle::InParams {
        form.insert("client_id", config.client_id.as_str());
        form.insert("client_secret", config.client_secret.as_str());
    }
    form
}

/// Performs the client-credentials grant against `config.token_url`.
pub async fn exchange_client_credentials(
    client: &reqwest::Client,
    config: &OAuth2ClientCredentialsConfig,
) -> Result<ExchangedToken, CredentialError> {
    let form = client_credentials_form(config);
    let mut request = client
        .post(&config.token_url)
        .header(reqwest::header::ACCEPT, "application/json")
        .form(&form);
    if config.auth_style == AuthStyle::InHeader {
        request = request.basic_auth(&config.client_id, Some(&config.client_secret));
    }

    tracing::debug!(
        token_url = config.token_url.as_str(),
        auth_style = config.auth_style.as_str(),
        "requesting oauth2 client-credentials token"
    );
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_string());
        return Err(CredentialError::TokenExchange {
            status: Some(status.as_u16()),
            message: format!("HTTP {} {}", status.as_u16(), body),
        });
    }

    let payload = response
        .json::<Value>()
        .await
        .map_err(|error| CredentialError::TokenExchange {
            status: Some(status.as_u16()),
            message: format!("failed to decode token response body: {error}"),
        })?;
    let access_token = payload
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CredentialError::TokenExchange {
            status: Some(status.as_u16()),
            message: "token response missing access_token".to_string(),
        })?
        .to_string();
    let expires_unix = payload
        .get("expires_in")
        .and_then(Value::as_u64)
        .map(|expires_in| current_unix_timestamp().saturating_add(expires_in));

    Ok(ExchangedToken {
        access_token,
        expires_unix,
    })
}
