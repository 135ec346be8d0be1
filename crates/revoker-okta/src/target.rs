use revoker_core::ConfigBundle;

use crate::error::RevocationError;
use crate::types::JobParams;

pub const ADDRESS: &str = "ADDRESS";
pub const NO_URL_SPECIFIED: &str = "No URL specified";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn okta_domain_base_url(domain: &str) -> String {
    if domain.contains("://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// Resolves the API base address for this invocation.
///
/// Precedence: `address` param, `oktaDomain` param, then the `ADDRESS`
/// environment default. Trailing slashes are stripped; nothing else is validated.
pub fn resolve_base_url(params: &JobParams, env: &ConfigBundle) -> Result<String, RevocationError> {
    let resolved = if let Some(address) = non_blank(params.address.as_deref()) {
        address.to_string()
    } else if let Some(domain) = non_blank(params.okta_domain.as_deref()) {
        okta_domain_base_url(domain)
    } else if let Some(address) = env.non_empty(ADDRESS) {
        address.to_string()
    } else {
        return Err(RevocationError::Configuration(NO_URL_SPECIFIED.to_string()));
    };

    let trimmed = resolved.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(RevocationError::Configuration(NO_URL_SPECIFIED.to_string()));
    }
    Ok(trimmed.to_string())
}
