use thiserror::Error;

const PERMISSION_DENIED: i64 = 10011;
const PLANT_NOT_FOUND: i64 = 10012;
const FREQUENT_ACCESS: i64 = 10012;

/// Non-zero `error_code` in the response envelope.
///
/// Wrapped into [`anyhow::Error`] by the client, callers get it back via `downcast_ref`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Growatt API error {code} ({message})")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        self.code == PERMISSION_DENIED
    }

    /// Growatt reports throttling through the same code as a missing plant,
    /// only the message tells them apart.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.code == FREQUENT_ACCESS
            && (self.message == "error_frequently_access" || self.message.contains("frequently"))
    }

    #[must_use]
    pub fn is_plant_not_found(&self) -> bool {
        self.code == PLANT_NOT_FOUND && !self.is_rate_limited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(code: i64, message: &str) -> ApiError {
        ApiError { code, message: message.to_owned() }
    }

    #[test]
    fn test_classification() {
        assert!(error(10011, "error_permission_denied").is_permission_denied());
        assert!(error(10012, "error_plant_not_found").is_plant_not_found());

        let throttled = error(10012, "error_frequently_access");
        assert!(throttled.is_rate_limited());
        assert!(!throttled.is_plant_not_found());

        assert!(error(10012, "too frequently").is_rate_limited());
        assert!(!error(10001, "oops").is_rate_limited());
        assert!(!error(10001, "accessed too frequently").is_rate_limited());
        assert!(!error(10011, "error_frequently_access").is_rate_limited());
        assert!(!error(10001, "oops").is_permission_denied());
    }

    #[test]
    fn test_display() {
        assert_eq!(error(10011, "denied").to_string(), "Growatt API error 10011 (denied)");
    }
}
