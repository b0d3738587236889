//! Error types for locator system

use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LocatorError {
    /// Engine configuration rejected at construction time
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Batch analysis stopped before every descriptor was submitted
    #[error("Batch cancelled after {completed} of {total} descriptors")]
    Cancelled { completed: usize, total: usize },

    /// Code emission failed
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// Internal error (worker panic, join failure)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, LocatorError::Cancelled { .. })
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::Internal(_) => 3,
            LocatorError::InvalidConfig(_) => 2,
            LocatorError::Emit(_) => 1,
            LocatorError::Cancelled { .. } => 0,
        }
    }
}

/// Caller-contract violations raised by the code emitter
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// `input` action requested without a value to type
    #[error("Action 'input' on `{element}` requires a value")]
    MissingInputValue { element: String },

    /// No translation table exists for the requested dialect
    #[error("Unknown framework: {0}")]
    UnknownFramework(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_error_converts() {
        let err: LocatorError = EmitError::UnknownFramework("cypress".into()).into();
        assert_eq!(err.to_string(), "Unknown framework: cypress");
        assert_eq!(err.severity(), 1);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_cancelled_is_retryable() {
        let err = LocatorError::Cancelled {
            completed: 2,
            total: 5,
        };
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Batch cancelled after 2 of 5 descriptors");
    }
}
