//! # Scoria Error Handling
//!
//! Error types for the submission core.
//!
//! Error handling follows these principles:
//! - Errors are typed and categorized by subsystem
//! - Recoverable conditions are returned, never asserted
//! - Caller contract violations are asserted, never returned
//! - Errors are `no_std` compatible

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// Scoria Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// Scoria unified error type
///
/// Covers all recoverable error conditions in the submission core.
/// Contract violations (for example submitting a sync object that is not
/// in the reset state) are not represented here; they abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Generic Errors
    // =========================================================================
    /// Invalid parameter provided
    InvalidParameter,
    /// Object is in the wrong state for the operation
    InvalidState,
    /// Operation not supported by the installed dispatch
    NotSupported,

    // =========================================================================
    // Device Creation Errors
    // =========================================================================
    /// Out of host memory
    OutOfMemory,
    /// Per-device hardware channel cap reached
    TooManyChannels,
    /// A device creation stage failed for any other reason
    InitializationFailed,

    // =========================================================================
    // Command Submission Errors
    // =========================================================================
    /// Push stream reached its recording capacity
    PushBufferFull,
    /// The hardware layer rejected a push
    SubmissionFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Generic
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::InvalidState => write!(f, "invalid object state"),
            Self::NotSupported => write!(f, "operation not supported"),

            // Device creation
            Self::OutOfMemory => write!(f, "out of host memory"),
            Self::TooManyChannels => write!(f, "hardware channel cap reached"),
            Self::InitializationFailed => write!(f, "initialization failed"),

            // Submission
            Self::PushBufferFull => write!(f, "push buffer full"),
            Self::SubmissionFailed => write!(f, "submission failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let s = alloc::format!("{}", Error::TooManyChannels);
        assert!(s.contains("channel cap"));
    }

    #[test]
    fn test_error_is_copy() {
        let e = Error::OutOfMemory;
        let e2 = e;
        assert_eq!(e, e2);
    }
}
