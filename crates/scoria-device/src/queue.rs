//! # Logical Queue
//!
//! The device's logical queue abstraction: capability flags, a queue
//! specification from the creation parameters, and the binding of the
//! driver's submit routine.

use scoria_core::{Error, Result};

use crate::device::Device;
use crate::dispatch::QueueSubmitFn;
use crate::submit::SubmitBatch;

// =============================================================================
// QUEUE FLAGS
// =============================================================================

bitflags::bitflags! {
    /// Queue capability flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct QueueFlags: u32 {
        /// Graphics work
        const GRAPHICS = 1 << 0;
        /// Compute work
        const COMPUTE = 1 << 1;
        /// Transfer work
        const TRANSFER = 1 << 2;
    }
}

// =============================================================================
// QUEUE CREATE INFO
// =============================================================================

/// One logical-queue specification in the device creation parameters
#[derive(Debug, Clone)]
pub struct QueueCreateInfo {
    /// Queue family index
    pub family_index: u32,
    /// Number of queues requested in this family
    pub queue_count: u32,
    /// Capabilities requested
    pub flags: QueueFlags,
}

impl Default for QueueCreateInfo {
    fn default() -> Self {
        Self {
            family_index: 0,
            queue_count: 1,
            flags: QueueFlags::GRAPHICS | QueueFlags::COMPUTE | QueueFlags::TRANSFER,
        }
    }
}

// =============================================================================
// QUEUE
// =============================================================================

/// A logical queue bound to the driver's submit routine
#[derive(Debug)]
pub struct Queue {
    /// Queue family index
    family_index: u32,
    /// Index within the family
    index: u32,
    /// Capabilities
    flags: QueueFlags,
    /// Driver-side submit binding, installed at device creation
    driver_submit: QueueSubmitFn,
}

impl Queue {
    /// Initialize a logical queue from its specification
    pub(crate) fn init(
        info: &QueueCreateInfo,
        index: u32,
        driver_submit: QueueSubmitFn,
    ) -> Result<Self> {
        if info.queue_count == 0 || index >= info.queue_count {
            return Err(Error::InvalidParameter);
        }
        Ok(Self {
            family_index: info.family_index,
            index,
            flags: info.flags,
            driver_submit,
        })
    }

    /// Get the queue family index
    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    /// Get the index within the family
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Get the capability flags
    pub fn flags(&self) -> QueueFlags {
        self.flags
    }

    /// Run a submission through the installed driver binding
    pub(crate) fn submit(&self, device: &Device, batch: &mut SubmitBatch<'_>) -> Result<()> {
        (self.driver_submit)(device, batch)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_submit(_: &Device, _: &mut SubmitBatch<'_>) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_init_validates_queue_count() {
        let info = QueueCreateInfo {
            queue_count: 0,
            ..QueueCreateInfo::default()
        };
        assert_eq!(
            Queue::init(&info, 0, stub_submit).unwrap_err(),
            Error::InvalidParameter
        );
    }

    #[test]
    fn test_init_validates_index() {
        let info = QueueCreateInfo::default();
        assert!(Queue::init(&info, 0, stub_submit).is_ok());
        assert_eq!(
            Queue::init(&info, 1, stub_submit).unwrap_err(),
            Error::InvalidParameter
        );
    }

    #[test]
    fn test_queue_carries_spec() {
        let info = QueueCreateInfo {
            family_index: 2,
            queue_count: 4,
            flags: QueueFlags::COMPUTE,
        };
        let queue = Queue::init(&info, 3, stub_submit).unwrap();
        assert_eq!(queue.family_index(), 2);
        assert_eq!(queue.index(), 3);
        assert_eq!(queue.flags(), QueueFlags::COMPUTE);
    }
}
