//! # Sync Objects
//!
//! Completion fences for submitted work ("BO syncs") and the generic sync
//! handle they are selected from.
//!
//! The submission core drives exactly one transition: `Reset` to
//! `Submitted`, under the owning device's submission lock. Completion
//! detection and re-arming for reuse are external responsibilities; the
//! external path must confirm hardware completion before re-arming, or a
//! later submission will trip the reset-state assertion.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::types::BoHandle;

// =============================================================================
// SYNC STATE
// =============================================================================

/// Lifecycle state of a BO sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyncState {
    /// Armed and ready to be attached to a submission
    Reset = 0,
    /// Work referencing this sync has been pushed to hardware
    Submitted = 1,
    /// Hardware completion observed (set by the external completion path)
    Signaled = 2,
}

impl SyncState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Reset,
            1 => Self::Submitted,
            _ => Self::Signaled,
        }
    }
}

// =============================================================================
// GENERIC SYNC HANDLE
// =============================================================================

/// Generic synchronization handle
///
/// The surrounding framework traffics in this trait; the submission core
/// selects its own representation through the [`SyncHandle::as_bo_sync`]
/// capability. A handle that is not a BO sync returns `None`, which the
/// submit path treats as a caller contract violation.
pub trait SyncHandle: Send + Sync {
    /// Downcast to the driver's BO sync representation, if this is one
    fn as_bo_sync(&self) -> Option<&BoSync> {
        None
    }
}

// =============================================================================
// BO SYNC
// =============================================================================

/// Completion fence backed by a buffer object
///
/// The buffer object is referenced into every command buffer of a
/// submission that signals this sync, so the hardware dependency tracker
/// orders overlapping work. Only the state field is ever contended: the
/// core mutates it under the device lock, and the external completion
/// path must use an equivalent or coarser discipline.
pub struct BoSync {
    /// Backing buffer object
    bo: BoHandle,
    /// Current lifecycle state
    state: AtomicU8,
}

impl BoSync {
    /// Create a sync in the `Reset` state
    pub fn new(bo: BoHandle) -> Self {
        Self {
            bo,
            state: AtomicU8::new(SyncState::Reset as u8),
        }
    }

    /// Get the backing buffer object
    pub fn bo(&self) -> BoHandle {
        self.bo
    }

    /// Get the current state
    pub fn state(&self) -> SyncState {
        SyncState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Transition `Reset` to `Submitted`
    ///
    /// Called by the submit protocol under the device lock. A sync that is
    /// not in the `Reset` state at this point is a caller bug (the batch
    /// recorder reused a sync before completion was confirmed); the state
    /// is left untouched and the process aborts.
    pub fn mark_submitted(&self) {
        let res = self.state.compare_exchange(
            SyncState::Reset as u8,
            SyncState::Submitted as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if let Err(actual) = res {
            panic!(
                "BO sync {:?} submitted while in state {:?}",
                self.bo,
                SyncState::from_raw(actual)
            );
        }
    }

    /// Record hardware completion (external completion-detection path)
    pub fn signal(&self) {
        self.state
            .store(SyncState::Signaled as u8, Ordering::Release);
    }

    /// Re-arm for reuse (external path, after completion is confirmed)
    pub fn re_arm(&self) {
        self.state.store(SyncState::Reset as u8, Ordering::Release);
    }
}

impl SyncHandle for BoSync {
    fn as_bo_sync(&self) -> Option<&BoSync> {
        Some(self)
    }
}

impl fmt::Debug for BoSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoSync({:?}, {:?})", self.bo, self.state())
    }
}

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

static_assertions::assert_impl_all!(BoSync: Send, Sync);

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sync_is_reset() {
        let sync = BoSync::new(BoHandle::new(1));
        assert_eq!(sync.state(), SyncState::Reset);
    }

    #[test]
    fn test_submit_signal_rearm_cycle() {
        let sync = BoSync::new(BoHandle::new(1));
        sync.mark_submitted();
        assert_eq!(sync.state(), SyncState::Submitted);
        sync.signal();
        assert_eq!(sync.state(), SyncState::Signaled);
        sync.re_arm();
        assert_eq!(sync.state(), SyncState::Reset);
        sync.mark_submitted();
        assert_eq!(sync.state(), SyncState::Submitted);
    }

    #[test]
    #[should_panic(expected = "submitted while in state")]
    fn test_double_submit_aborts() {
        let sync = BoSync::new(BoHandle::new(1));
        sync.mark_submitted();
        sync.mark_submitted();
    }

    #[test]
    fn test_foreign_handle_is_not_bo_sync() {
        struct ForeignSync;
        impl SyncHandle for ForeignSync {}

        let foreign = ForeignSync;
        assert!(foreign.as_bo_sync().is_none());

        let sync = BoSync::new(BoHandle::new(2));
        let generic: &dyn SyncHandle = &sync;
        assert!(generic.as_bo_sync().is_some());
    }
}
