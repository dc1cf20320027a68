//! # Logical Device
//!
//! One logical execution context bound to a physical accelerator.
//!
//! A device owns exactly one hardware queue context for its lifetime,
//! one submission lock serializing all submits, and one condition signal
//! broadcast after every submission. Creation is staged and unwinds
//! partial initialization in strict reverse order; teardown mirrors
//! creation exactly.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use scoria_cmd::QueueContext;
use scoria_core::{Error, PhysicalDevice, Result};

use crate::dispatch::{DispatchTable, Entrypoints};
use crate::queue::{Queue, QueueCreateInfo};
use crate::result::CreateDeviceError;

// =============================================================================
// DEVICE CREATE INFO
// =============================================================================

/// Device creation parameters
#[derive(Debug, Clone, Default)]
pub struct DeviceCreateInfo {
    /// Logical-queue specifications; at least one is required
    pub queue_infos: Vec<QueueCreateInfo>,
    /// Presentation collaborator entry points, merged into the dispatch
    /// table behind the driver's own
    pub presentation: Entrypoints,
}

impl DeviceCreateInfo {
    /// Creation parameters with the given queue specifications
    pub fn new(queue_infos: Vec<QueueCreateInfo>) -> Self {
        Self {
            queue_infos,
            presentation: Entrypoints::NONE,
        }
    }
}

// =============================================================================
// DEVICE
// =============================================================================

/// State guarded by the device-wide submission lock
///
/// The hardware queue context lives inside the lock: it is exclusively
/// owned by the device and only ever touched during a serialized submit.
pub(crate) struct SubmitState {
    /// The device's single hardware queue context
    pub(crate) ctx: QueueContext,
    /// Submissions completed on this device
    pub(crate) submissions: u64,
}

/// A logical device
///
/// Field declaration order is teardown order, mirroring creation in
/// reverse: condition signal, submission lock (which owns the queue
/// context), logical queue, dispatch, physical-device reference.
pub struct Device {
    /// Broadcast after every submission; waited on by external threads.
    /// Timed waits run against the monotonic clock.
    queue_submit: Condvar,
    /// Serializes all submissions on this device
    submit_state: Mutex<SubmitState>,
    /// The logical queue, submit operation bound to the driver routine
    queue: Queue,
    /// Merged operation dispatch
    dispatch: DispatchTable,
    /// Set last during creation: a returned device is fully valid
    pdev: Arc<PhysicalDevice>,
}

/// The driver's own entry-point contributions
const DRIVER_ENTRYPOINTS: Entrypoints = Entrypoints {
    queue_submit: Some(Device::driver_submit),
    acquire_image: None,
    queue_present: None,
};

impl Device {
    /// Create a logical device
    ///
    /// Stages, in order: validate the creation parameters, install the
    /// dispatch table, create the hardware queue context, initialize the
    /// logical queue with its submit binding, initialize the submission
    /// lock and condition signal. A failing stage unwinds exactly the
    /// stages that succeeded, in reverse order, through the guards those
    /// stages returned.
    pub fn create(
        pdev: &Arc<PhysicalDevice>,
        info: &DeviceCreateInfo,
    ) -> core::result::Result<Box<Self>, CreateDeviceError> {
        // Stage 1: parameter validation and dispatch install. The
        // presentation slots are delegated to the external collaborator.
        let Some(queue_info) = info.queue_infos.first() else {
            return Err(CreateDeviceError::InitializationFailed);
        };
        let dispatch = DispatchTable::from_entrypoints(&DRIVER_ENTRYPOINTS, &info.presentation);

        // Stage 2: exactly one hardware queue context. The channel cap
        // surfaces as TooManyObjects, allocation failure as
        // OutOfHostMemory; everything else collapses below.
        let ctx = QueueContext::create(pdev)?;

        // Stage 3: logical queue, submit operation bound to the driver
        // routine. On failure `ctx` drops here and releases its slot.
        let queue = Queue::init(queue_info, 0, Self::driver_submit)?;

        // Stages 4-5: submission lock and monotonic condition signal.
        let device = Box::new(Self {
            queue_submit: Condvar::new(),
            submit_state: Mutex::new(SubmitState {
                ctx,
                submissions: 0,
            }),
            queue,
            dispatch,
            pdev: Arc::clone(pdev),
        });

        log::debug!("{}: created device", pdev.name());
        Ok(device)
    }

    /// Get the physical device
    pub fn physical_device(&self) -> &Arc<PhysicalDevice> {
        &self.pdev
    }

    /// Get the logical queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Get the operation dispatch
    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Number of submissions this device has completed
    pub fn submission_count(&self) -> u64 {
        self.lock_submit_state().submissions
    }

    /// Inspect the hardware queue context
    ///
    /// Takes the submission lock for the duration of `f`; used by the
    /// external completion-detection path to read the channel's push log.
    pub fn with_queue_context<R>(&self, f: impl FnOnce(&QueueContext) -> R) -> R {
        f(&self.lock_submit_state().ctx)
    }

    /// Block until a submission happens or the timeout elapses
    ///
    /// Returns `true` if a submission was observed. The deadline is
    /// measured against the monotonic clock, so wall-clock adjustments
    /// cannot shorten or extend the wait. The device itself never waits
    /// on its own signal; it only broadcasts.
    pub fn wait_for_submission(&self, timeout: Duration) -> bool {
        let state = self.lock_submit_state();
        let seen = state.submissions;
        let (_state, res) = self
            .queue_submit
            .wait_timeout_while(state, timeout, |s| s.submissions == seen)
            .expect("device submission lock poisoned");
        !res.timed_out()
    }

    /// Route to the presentation collaborator's acquire-image entry point
    pub fn acquire_image(&self) -> Result<()> {
        match self.dispatch.acquire_image() {
            Some(f) => f(self),
            None => Err(Error::NotSupported),
        }
    }

    /// Route to the presentation collaborator's queue-present entry point
    pub fn queue_present(&self) -> Result<()> {
        match self.dispatch.queue_present() {
            Some(f) => f(self),
            None => Err(Error::NotSupported),
        }
    }

    /// Take the device-wide submission lock
    ///
    /// A poisoned lock means a submit aborted mid-protocol; ordering
    /// invariants are gone at that point and continuing would corrupt
    /// completion tracking.
    pub(crate) fn lock_submit_state(&self) -> MutexGuard<'_, SubmitState> {
        self.submit_state
            .lock()
            .expect("device submission lock poisoned")
    }

    /// Wake every thread blocked on the submission signal
    pub(crate) fn broadcast_submit(&self) {
        self.queue_submit.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn close_queue_context(&self) {
        self.lock_submit_state().ctx.close();
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Deliberately does not take the submission lock
        write!(f, "Device({})", self.pdev.name())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        log::debug!("{}: destroying device", self.pdev.name());
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Destroy a logical device
///
/// Tolerates an absent handle. The caller must have retired all
/// submitted work; teardown does not drain the queue context.
pub fn destroy_device(device: Option<Box<Device>>) {
    let Some(device) = device else {
        return;
    };
    drop(device);
}

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

static_assertions::assert_impl_all!(Device: Send, Sync);

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scoria_core::Result;

    fn pdev(max_channels: u32) -> Arc<PhysicalDevice> {
        Arc::new(PhysicalDevice::new("test-gpu", 0x10DE, 0x2684, max_channels))
    }

    fn default_info() -> DeviceCreateInfo {
        DeviceCreateInfo::new(vec![QueueCreateInfo::default()])
    }

    #[test]
    fn test_create_destroy_cycle() {
        let dev = pdev(4);
        let device = Device::create(&dev, &default_info()).unwrap();
        assert_eq!(dev.active_channels(), 1);
        assert_eq!(device.submission_count(), 0);
        assert_eq!(device.queue().family_index(), 0);
        destroy_device(Some(device));
        assert_eq!(dev.active_channels(), 0);
    }

    #[test]
    fn test_destroy_absent_device_is_noop() {
        destroy_device(None);
    }

    #[test]
    fn test_create_requires_a_queue_spec() {
        let dev = pdev(4);
        let info = DeviceCreateInfo::new(Vec::new());
        assert_eq!(
            Device::create(&dev, &info).unwrap_err(),
            CreateDeviceError::InitializationFailed
        );
        assert_eq!(dev.active_channels(), 0);
    }

    #[test]
    fn test_channel_cap_surfaces_too_many_objects() {
        let dev = pdev(1);
        let first = Device::create(&dev, &default_info()).unwrap();
        assert_eq!(
            Device::create(&dev, &default_info()).unwrap_err(),
            CreateDeviceError::TooManyObjects
        );
        // The failed attempt must not leak a channel slot
        assert_eq!(dev.active_channels(), 1);
        destroy_device(Some(first));
        assert_eq!(dev.active_channels(), 0);
    }

    #[test]
    fn test_failed_queue_stage_unwinds_channel() {
        let dev = pdev(4);
        let info = DeviceCreateInfo::new(vec![QueueCreateInfo {
            queue_count: 0,
            ..QueueCreateInfo::default()
        }]);
        assert_eq!(
            Device::create(&dev, &info).unwrap_err(),
            CreateDeviceError::InitializationFailed
        );
        // Stage 2 succeeded, stage 3 failed: the slot must be back
        assert_eq!(dev.active_channels(), 0);
    }

    #[test]
    fn test_presentation_slots_delegate_to_collaborator() {
        fn collaborator_acquire(_: &Device) -> Result<()> {
            Ok(())
        }

        let dev = pdev(4);
        let mut info = default_info();
        info.presentation = Entrypoints {
            acquire_image: Some(collaborator_acquire),
            ..Entrypoints::NONE
        };
        let device = Device::create(&dev, &info).unwrap();

        assert!(device.acquire_image().is_ok());
        // No collaborator present slot was contributed
        assert_eq!(device.queue_present().unwrap_err(), Error::NotSupported);
        // The driver's own submit slot survived the merge
        assert!(device.dispatch().queue_submit().is_some());
    }

    #[test]
    fn test_wait_times_out_when_idle() {
        let dev = pdev(4);
        let device = Device::create(&dev, &default_info()).unwrap();
        assert!(!device.wait_for_submission(Duration::from_millis(10)));
    }
}
