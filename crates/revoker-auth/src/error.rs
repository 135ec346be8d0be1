use thiserror::Error;

#[derive(Debug, Error)]
/// Failures raised while turning a secret bundle into an authorization header.
pub enum CredentialError {
    #[error("{0}")]
    Configuration(String),
    #[error("OAuth2 token exchange failed: {message}")]
    TokenExchange { status: Option<u16>, message: String },
    #[error("OAuth2 token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl CredentialError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// HTTP status reported by the token endpoint, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::TokenExchange { status, .. } => *status,
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            Self::Configuration(_) => None,
        }
    }
}
