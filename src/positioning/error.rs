//! Positioning error types

use std::fmt;

/// Positioning failure reported by the location capability.
///
/// Every variant is recoverable: the session records the message and keeps
/// billing on the time-based fallback instead of stopping.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionError {
    /// The platform exposes no positioning capability
    Unsupported,
    /// The user or platform denied access to positioning
    PermissionDenied,
    /// No fix arrived within the bounded wait
    Timeout { timeout_ms: u32 },
    /// The capability exists but could not produce a fix
    Unavailable { details: String },
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Unsupported => {
                write!(f, "Positioning is not supported on this device")
            }
            PositionError::PermissionDenied => {
                write!(f, "Positioning permission denied")
            }
            PositionError::Timeout { timeout_ms } => {
                write!(f, "Position fix timed out after {}ms", timeout_ms)
            }
            PositionError::Unavailable { details } => {
                write!(f, "Position unavailable: {}", details)
            }
        }
    }
}

impl std::error::Error for PositionError {}

/// Result type for positioning operations
pub type PositionResult<T> = Result<T, PositionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_human_readable() {
        assert_eq!(
            PositionError::Timeout { timeout_ms: 5000 }.to_string(),
            "Position fix timed out after 5000ms"
        );
        assert!(PositionError::Unsupported.to_string().contains("not supported"));
        assert!(
            PositionError::Unavailable {
                details: "no satellites".to_string()
            }
            .to_string()
            .contains("no satellites")
        );
    }
}
