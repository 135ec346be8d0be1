//! Foundational low-level utilities shared across revoker crates.
//!
//! Provides the key/value bundle used for secrets and environment settings,
//! plus time helpers used for result timestamps and token expiry checks.

pub mod config_bundle;
pub mod time_utils;

pub use config_bundle::ConfigBundle;
pub use time_utils::{current_iso8601_timestamp, current_unix_timestamp, is_expired_unix};

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn is_expired_unix_respects_none_and_bounds() {
        let now = current_unix_timestamp();
        assert!(!is_expired_unix(None, now));
        assert!(is_expired_unix(Some(now), now));
        assert!(is_expired_unix(Some(now.saturating_sub(1)), now));
        assert!(!is_expired_unix(Some(now.saturating_add(1)), now));
    }

    #[test]
    fn unit_iso8601_timestamp_is_parseable_utc_with_millis() {
        let raw = current_iso8601_timestamp();
        assert!(raw.ends_with('Z'), "expected Z suffix in {raw}");
        let parsed = DateTime::parse_from_rfc3339(&raw).expect("rfc3339 timestamp");
        let seconds = i64::try_from(current_unix_timestamp()).expect("timestamp fits i64");
        assert!((parsed.timestamp() - seconds).abs() <= 1);
        let fraction = raw.rsplit('.').next().expect("fractional part");
        assert_eq!(fraction.len(), "000Z".len());
    }

    #[test]
    fn unit_bundle_lookup_ignores_blank_values_and_trims() {
        let bundle = ConfigBundle::new()
            .with("PRESENT", "  value  ")
            .with("BLANK", "   ");
        assert_eq!(bundle.non_empty("PRESENT"), Some("value"));
        assert_eq!(bundle.non_empty("BLANK"), None);
        assert_eq!(bundle.non_empty("MISSING"), None);
        assert!(bundle.contains("PRESENT"));
        assert!(!bundle.contains("BLANK"));
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn functional_u64_lookup_falls_back_on_invalid_values() {
        let bundle = ConfigBundle::new()
            .with("VALID", "2500")
            .with("ZERO", "0")
            .with("NEGATIVE", "-5")
            .with("GARBAGE", "soon");
        assert_eq!(bundle.u64_or("VALID", 7), 2_500);
        assert_eq!(bundle.u64_or("ZERO", 7), 0);
        assert_eq!(bundle.u64_or("NEGATIVE", 7), 7);
        assert_eq!(bundle.u64_or("GARBAGE", 7), 7);
        assert_eq!(bundle.u64_or("MISSING", 7), 7);
    }

    #[test]
    fn regression_bundle_debug_output_never_prints_values() {
        let bundle = ConfigBundle::new().with("BEARER_AUTH_TOKEN", "super-secret-token");
        let rendered = format!("{bundle:?}");
        assert!(rendered.contains("BEARER_AUTH_TOKEN"));
        assert!(!rendered.contains("super-secret-token"));
    }
}
