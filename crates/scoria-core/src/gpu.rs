//! # Physical Device
//!
//! Capability descriptor for one physical accelerator, plus the
//! channel-slot accounting that backs the per-device hardware context cap.
//!
//! Enumeration of physical devices belongs to the surrounding framework;
//! the submission core receives an already validated descriptor and only
//! consumes it through this narrow interface.

use alloc::sync::Arc;
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};

// =============================================================================
// PHYSICAL DEVICE
// =============================================================================

/// Validated descriptor for one physical accelerator
///
/// Each logical device created on top of this descriptor consumes exactly
/// one hardware channel slot for its lifetime. The slot count is the hard
/// resource cap that distinguishes [`Error::TooManyChannels`] from generic
/// out-of-memory conditions during device creation.
pub struct PhysicalDevice {
    /// Marketing name, for logs only
    name: &'static str,
    /// PCI vendor ID
    vendor_id: u16,
    /// PCI device ID
    device_id: u16,
    /// Hard cap on concurrently live hardware channels
    max_channels: u32,
    /// Currently live hardware channels
    active_channels: AtomicU32,
}

impl PhysicalDevice {
    /// Create a descriptor
    pub fn new(name: &'static str, vendor_id: u16, device_id: u16, max_channels: u32) -> Self {
        Self {
            name,
            vendor_id,
            device_id,
            max_channels,
            active_channels: AtomicU32::new(0),
        }
    }

    /// Get the device name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the PCI vendor ID
    pub fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    /// Get the PCI device ID
    pub fn device_id(&self) -> u16 {
        self.device_id
    }

    /// Get the hardware channel cap
    pub fn max_channels(&self) -> u32 {
        self.max_channels
    }

    /// Get the number of currently live hardware channels
    pub fn active_channels(&self) -> u32 {
        self.active_channels.load(Ordering::Acquire)
    }

    /// Acquire one hardware channel slot
    ///
    /// Returns a guard that releases the slot when dropped, so a failed
    /// later creation stage unwinds the acquisition without extra
    /// bookkeeping. Fails with [`Error::TooManyChannels`] once the cap is
    /// reached.
    pub fn acquire_channel(self: &Arc<Self>) -> Result<ChannelSlot> {
        let res = self
            .active_channels
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |active| {
                if active < self.max_channels {
                    Some(active + 1)
                } else {
                    None
                }
            });

        match res {
            Ok(_) => Ok(ChannelSlot {
                pdev: Arc::clone(self),
            }),
            Err(_) => {
                log::warn!(
                    "{}: channel cap ({}) reached",
                    self.name,
                    self.max_channels
                );
                Err(Error::TooManyChannels)
            }
        }
    }
}

impl fmt::Debug for PhysicalDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhysicalDevice({}, {:04x}:{:04x}, {}/{} channels)",
            self.name,
            self.vendor_id,
            self.device_id,
            self.active_channels(),
            self.max_channels
        )
    }
}

// =============================================================================
// CHANNEL SLOT GUARD
// =============================================================================

/// Scoped ownership of one hardware channel slot
///
/// Held by the live channel for its whole lifetime; dropping it returns
/// the slot to the physical device.
pub struct ChannelSlot {
    pdev: Arc<PhysicalDevice>,
}

impl ChannelSlot {
    /// Get the physical device this slot was acquired from
    pub fn physical_device(&self) -> &Arc<PhysicalDevice> {
        &self.pdev
    }
}

impl Drop for ChannelSlot {
    fn drop(&mut self) {
        self.pdev.active_channels.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for ChannelSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelSlot({})", self.pdev.name)
    }
}

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

static_assertions::assert_impl_all!(PhysicalDevice: Send, Sync);
static_assertions::assert_impl_all!(ChannelSlot: Send, Sync);

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pdev(max_channels: u32) -> Arc<PhysicalDevice> {
        Arc::new(PhysicalDevice::new("test-gpu", 0x10DE, 0x2684, max_channels))
    }

    #[test]
    fn test_acquire_up_to_cap() {
        let dev = pdev(2);
        let a = dev.acquire_channel().unwrap();
        let b = dev.acquire_channel().unwrap();
        assert_eq!(dev.active_channels(), 2);
        assert_eq!(dev.acquire_channel().unwrap_err(), Error::TooManyChannels);
        drop(a);
        drop(b);
        assert_eq!(dev.active_channels(), 0);
    }

    #[test]
    fn test_slot_released_on_drop() {
        let dev = pdev(1);
        {
            let _slot = dev.acquire_channel().unwrap();
            assert_eq!(dev.active_channels(), 1);
        }
        assert_eq!(dev.active_channels(), 0);
        assert!(dev.acquire_channel().is_ok());
    }
}
