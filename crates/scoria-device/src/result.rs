//! # Device Creation Error Codes
//!
//! The three error codes the surrounding framework understands from
//! device creation, and their mapping from the core error taxonomy.

use core::fmt;

use scoria_core::Error;

// =============================================================================
// CREATE DEVICE ERROR
// =============================================================================

/// Error code surfaced by device creation
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateDeviceError {
    /// Host allocation failed
    OutOfHostMemory = -1,
    /// Any setup stage failed for a reason other than resource exhaustion
    InitializationFailed = -3,
    /// The hardware channel cap was reached
    TooManyObjects = -10,
}

impl CreateDeviceError {
    /// Convert to the framework's raw code
    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for CreateDeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfHostMemory => write!(f, "out of host memory"),
            Self::InitializationFailed => write!(f, "initialization failed"),
            Self::TooManyObjects => write!(f, "too many objects"),
        }
    }
}

impl std::error::Error for CreateDeviceError {}

impl From<Error> for CreateDeviceError {
    fn from(e: Error) -> Self {
        match e {
            Error::OutOfMemory => Self::OutOfHostMemory,
            Error::TooManyChannels => Self::TooManyObjects,
            _ => Self::InitializationFailed,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_cap_maps_to_too_many_objects() {
        assert_eq!(
            CreateDeviceError::from(Error::TooManyChannels),
            CreateDeviceError::TooManyObjects
        );
    }

    #[test]
    fn test_other_errors_collapse_to_initialization_failed() {
        assert_eq!(
            CreateDeviceError::from(Error::InvalidParameter),
            CreateDeviceError::InitializationFailed
        );
        assert_eq!(
            CreateDeviceError::from(Error::SubmissionFailed),
            CreateDeviceError::InitializationFailed
        );
    }

    #[test]
    fn test_raw_codes() {
        assert_eq!(CreateDeviceError::OutOfHostMemory.as_raw(), -1);
        assert_eq!(CreateDeviceError::TooManyObjects.as_raw(), -10);
    }
}
