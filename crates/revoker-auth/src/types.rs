use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const BEARER_AUTH_TOKEN: &str = "BEARER_AUTH_TOKEN";
pub const BASIC_USERNAME: &str = "BASIC_USERNAME";
pub const BASIC_PASSWORD: &str = "BASIC_PASSWORD";
pub const OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN: &str = "OAUTH2_AUTHORIZATION_CODE_ACCESS_TOKEN";
pub const OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET: &str =
    "OAUTH2_CLIENT_CREDENTIALS_CLIENT_SECRET";

pub const OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL: &str = "OAUTH2_CLIENT_CREDENTIALS_TOKEN_URL";
pub const OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID: &str = "OAUTH2_CLIENT_CREDENTIALS_CLIENT_ID";
pub const OAUTH2_CLIENT_CREDENTIALS_SCOPE: &str = "OAUTH2_CLIENT_CREDENTIALS_SCOPE";
pub const OAUTH2_CLIENT_CREDENTIALS_AUDIENCE: &str = "OAUTH2_CLIENT_CREDENTIALS_AUDIENCE";
pub const OAUTH2_CLIENT_CREDENTIALS_AUTH_STYLE: &str = "OAUTH2_CLIENT_CREDENTIALS_AUTH_STYLE";

pub const BEARER_PREFIX: &str = "Bearer ";
const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Where client credentials travel during the client-credentials exchange.
pub enum AuthStyle {
    /// HTTP Basic `Authorization` header.
    #[default]
    InHeader,
    /// `client_id` / `client_secret` form parameters.
    InParams,
}

impl AuthStyle {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("inparams") => Self::InParams,
            _ => Self::InHeader,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InHeader => "InHeader",
            Self::InParams => "InParams",
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Settings for the OAuth2 client-credentials grant.
pub struct OAuth2ClientCredentialsConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
    pub audience: Option<String>,
    pub auth_style: AuthStyle,
}

impl std::fmt::Debug for OAuth2ClientCredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2ClientCredentialsConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("audience", &self.audience)
            .field("auth_style", &self.auth_style)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
/// The authentication method found in a secret bundle.
pub enum AuthMethod {
    BearerToken { token: String },
    BasicAuth { username: String, password: String },
    OAuth2AccessToken { token: String },
    OAuth2ClientCredentials(OAuth2ClientCredentialsConfig),
}

impl AuthMethod {
    /// Stable label for logs. Never includes credential material.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BearerToken { .. } => "bearer_token",
            Self::BasicAuth { .. } => "basic_auth",
            Self::OAuth2AccessToken { .. } => "oauth2_access_token",
            Self::OAuth2ClientCredentials(_) => "oauth2_client_credentials",
        }
    }
}

impl std::fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicAuth { username, .. } => f
                .debug_struct("BasicAuth")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::OAuth2ClientCredentials(config) => f
                .debug_tuple("OAuth2ClientCredentials")
                .field(config)
                .finish(),
            Self::BearerToken { .. } | Self::OAuth2AccessToken { .. } => f
                .debug_struct(self.as_str())
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
/// A ready-to-send `Authorization` header value.
pub struct AuthorizationHeader(String);

impl AuthorizationHeader {
    /// Wraps a token as `Bearer <token>`, keeping an existing `Bearer ` prefix as-is.
    pub fn bearer(token: &str) -> Self {
        if token.starts_with(BEARER_PREFIX) {
            Self(token.to_string())
        } else {
            Self(format!("{BEARER_PREFIX}{token}"))
        }
    }

    pub fn basic(username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        Self(format!("{BASIC_PREFIX}{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replaces a leading `Bearer ` with `scheme_prefix`; other schemes pass through untouched.
    pub fn with_bearer_scheme_replaced(&self, scheme_prefix: &str) -> Self {
        match self.0.strip_prefix(BEARER_PREFIX) {
            Some(token) => Self(format!("{scheme_prefix}{token}")),
            None => self.clone(),
        }
    }
}

impl std::fmt::Debug for AuthorizationHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scheme = self.0.split_once(' ').map_or("<opaque>", |(scheme, _)| scheme);
        write!(f, "AuthorizationHeader({scheme} <redacted>)")
    }
}
