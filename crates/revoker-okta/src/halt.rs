use revoker_core::current_iso8601_timestamp;

use crate::types::{HaltParams, HaltResult};

pub const UNKNOWN_USER: &str = "unknown";
pub const UNSPECIFIED_REASON: &str = "unspecified";

/// Acknowledges a cancellation.
///
/// A single DELETE leaves no partial state behind, so cleanup is always
/// complete. Does not abort an in-flight request.
pub fn halt(params: &HaltParams) -> HaltResult {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNKNOWN_USER)
        .to_string();
    let reason = params
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(UNSPECIFIED_REASON)
        .to_string();
    tracing::info!(
        user_id = user_id.as_str(),
        reason = reason.as_str(),
        "session revocation job halted"
    );
    HaltResult {
        user_id,
        reason,
        halted_at: current_iso8601_timestamp(),
        cleanup_completed: true,
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::halt;
    use crate::types::HaltParams;

    #[test]
    fn unit_halt_without_user_reports_unknown() {
        let result = halt(&HaltParams {
            user_id: None,
            reason: Some("cancelled".to_string()),
        });
        assert_eq!(result.user_id, "unknown");
        assert_eq!(result.reason, "cancelled");
        assert!(result.cleanup_completed);
        DateTime::parse_from_rfc3339(&result.halted_at).expect("valid timestamp");
    }

    #[test]
    fn functional_halt_echoes_user_and_defaults_reason() {
        let result = halt(&HaltParams {
            user_id: Some("00u1abcd".to_string()),
            reason: None,
        });
        assert_eq!(result.user_id, "00u1abcd");
        assert_eq!(result.reason, "unspecified");
    }
}
