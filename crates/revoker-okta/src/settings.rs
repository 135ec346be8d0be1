use std::time::Duration;

use revoker_core::ConfigBundle;

pub const RATE_LIMIT_BACKOFF_MS: &str = "RATE_LIMIT_BACKOFF_MS";
pub const SERVICE_ERROR_BACKOFF_MS: &str = "SERVICE_ERROR_BACKOFF_MS";
pub const REQUEST_TIMEOUT_MS: &str = "REQUEST_TIMEOUT_MS";
pub const RECOVERY_MODE: &str = "RECOVERY_MODE";

pub const DEFAULT_RATE_LIMIT_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_SERVICE_ERROR_BACKOFF_MS: u64 = 10_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Who owns the retry after a failed revocation.
pub enum RecoveryMode {
    /// Wait the configured backoff and retry once inside `recover`.
    #[default]
    SelfManaged,
    /// Re-raise the original error and let the job framework schedule retries.
    Framework,
}

impl RecoveryMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("framework") => Self::Framework,
            _ => Self::SelfManaged,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelfManaged => "self",
            Self::Framework => "framework",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Fixed waits inserted before the single retry.
pub struct BackoffConfig {
    pub rate_limit: Duration,
    pub service_error: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            rate_limit: Duration::from_millis(DEFAULT_RATE_LIMIT_BACKOFF_MS),
            service_error: Duration::from_millis(DEFAULT_SERVICE_ERROR_BACKOFF_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Runtime settings read from the environment bundle.
pub struct RevocationSettings {
    pub backoff: BackoffConfig,
    pub recovery_mode: RecoveryMode,
    pub request_timeout_ms: u64,
}

impl RevocationSettings {
    /// Parses settings; invalid or missing values fall back to defaults.
    pub fn from_env(env: &ConfigBundle) -> Self {
        Self {
            backoff: BackoffConfig {
                rate_limit: Duration::from_millis(
                    env.u64_or(RATE_LIMIT_BACKOFF_MS, DEFAULT_RATE_LIMIT_BACKOFF_MS),
                ),
                service_error: Duration::from_millis(
                    env.u64_or(SERVICE_ERROR_BACKOFF_MS, DEFAULT_SERVICE_ERROR_BACKOFF_MS),
                ),
            },
            recovery_mode: RecoveryMode::parse(env.non_empty(RECOVERY_MODE)),
            request_timeout_ms: env.u64_or(REQUEST_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use revoker_core::ConfigBundle;

    use super::{RecoveryMode, RevocationSettings};

    #[test]
    fn unit_defaults_apply_when_environment_is_empty() {
        let settings = RevocationSettings::from_env(&ConfigBundle::new());
        assert_eq!(settings.backoff.rate_limit, Duration::from_millis(30_000));
        assert_eq!(settings.backoff.service_error, Duration::from_millis(10_000));
        assert_eq!(settings.recovery_mode, RecoveryMode::SelfManaged);
        assert_eq!(settings.request_timeout_ms, 30_000);
    }

    #[test]
    fn functional_overrides_parse_and_invalid_values_fall_back() {
        let env = ConfigBundle::new()
            .with("RATE_LIMIT_BACKOFF_MS", "1500")
            .with("SERVICE_ERROR_BACKOFF_MS", "not-a-number")
            .with("RECOVERY_MODE", "Framework")
            .with("REQUEST_TIMEOUT_MS", "-1");
        let settings = RevocationSettings::from_env(&env);
        assert_eq!(settings.backoff.rate_limit, Duration::from_millis(1_500));
        assert_eq!(settings.backoff.service_error, Duration::from_millis(10_000));
        assert_eq!(settings.recovery_mode, RecoveryMode::Framework);
        assert_eq!(settings.request_timeout_ms, 30_000);
    }

    #[test]
    fn regression_unknown_recovery_mode_keeps_self_managed_retry() {
        assert_eq!(RecoveryMode::parse(Some("scheduler")), RecoveryMode::SelfManaged);
        assert_eq!(RecoveryMode::parse(None).as_str(), "self");
    }
}
