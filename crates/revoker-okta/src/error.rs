use revoker_auth::CredentialError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Every failure the session revocation job can report to its framework.
///
/// Messages carry the user id and upstream status/message where relevant and
/// never include credential values.
pub enum RevocationError {
    #[error("{0}")]
    Configuration(String),
    #[error("{0}")]
    Validation(String),
    #[error("{message}")]
    TokenExchange {
        status_code: Option<u16>,
        message: String,
    },
    #[error("{message}")]
    Http { status_code: u16, message: String },
    #[error("request to identity provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Recovery {
        status_code: Option<u16>,
        message: String,
    },
}

impl RevocationError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            Self::TokenExchange { status_code, .. } | Self::Recovery { status_code, .. } => {
                *status_code
            }
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            Self::Configuration(_) | Self::Validation(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Validation(_) => "validation_error",
            Self::TokenExchange { .. } => "token_exchange_error",
            Self::Http { .. } => "http_error",
            Self::Transport(_) => "transport_error",
            Self::Recovery { .. } => "recovery_error",
        }
    }

    /// True for failures that came back from the revocation call itself.
    /// Of these only [`RevocationError::Http`] may be retried.
    pub fn is_revocation_failure(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Transport(_))
    }
}

impl From<CredentialError> for RevocationError {
    fn from(error: CredentialError) -> Self {
        match error {
            CredentialError::Configuration(message) => Self::Configuration(message),
            other => Self::TokenExchange {
                status_code: other.status_code(),
                message: other.to_string(),
            },
        }
    }
}
