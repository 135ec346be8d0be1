//! Credential resolution for identity-provider API calls.
//!
//! Negotiates one of four authentication methods from a secret bundle and
//! produces an `Authorization` header value, performing an OAuth2
//! client-credentials exchange when that method is configured.

mod error;
mod oauth2;
mod resolver;
mod token_cache;
mod types;

pub use error::CredentialError;
pub use oauth2::{client_credentials_config_from_env, exchange_client_credentials, ExchangedToken};
pub use resolver::{configured_auth_method, CredentialResolver, NO_AUTHENTICATION_CONFIGURED};
pub use token_cache::{token_cache_key, CachedToken, InMemoryTokenCache, TokenCache};
pub use types::*;
