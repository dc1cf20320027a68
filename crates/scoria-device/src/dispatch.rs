//! # Dispatch Table
//!
//! Per-device operation routing.
//!
//! The device installs its own entry points first, then fills the
//! remaining slots from the presentation collaborator's entry points, so
//! generic framework machinery can route every call through one table.
//! The driver never overrides a slot it populated; the collaborator never
//! shadows a driver slot.

use scoria_core::Result;

use crate::device::Device;
use crate::submit::SubmitBatch;

// =============================================================================
// ENTRY POINT TYPES
// =============================================================================

/// Driver-side queue submission callback
///
/// Installed on the logical queue at device creation; invoked by the
/// framework's generic queue-submission entry point.
pub type QueueSubmitFn = fn(&Device, &mut SubmitBatch<'_>) -> Result<()>;

/// Presentation-layer entry point
///
/// Presentation is an external collaborator; the core only routes to it.
pub type PresentationFn = fn(&Device) -> Result<()>;

// =============================================================================
// ENTRYPOINTS
// =============================================================================

/// A set of entry points contributed by one layer
#[derive(Debug, Clone, Copy)]
pub struct Entrypoints {
    /// Queue submission
    pub queue_submit: Option<QueueSubmitFn>,
    /// Presentation: acquire the next image
    pub acquire_image: Option<PresentationFn>,
    /// Presentation: queue a present
    pub queue_present: Option<PresentationFn>,
}

impl Entrypoints {
    /// The empty contribution
    pub const NONE: Self = Self {
        queue_submit: None,
        acquire_image: None,
        queue_present: None,
    };
}

impl Default for Entrypoints {
    fn default() -> Self {
        Self::NONE
    }
}

// =============================================================================
// DISPATCH TABLE
// =============================================================================

/// The device's merged operation dispatch
#[derive(Debug, Clone, Copy)]
pub struct DispatchTable {
    queue_submit: Option<QueueSubmitFn>,
    acquire_image: Option<PresentationFn>,
    queue_present: Option<PresentationFn>,
}

impl DispatchTable {
    /// Build a table by layering entry points
    ///
    /// Primary slots win; secondary slots fill the gaps.
    pub fn from_entrypoints(primary: &Entrypoints, secondary: &Entrypoints) -> Self {
        Self {
            queue_submit: primary.queue_submit.or(secondary.queue_submit),
            acquire_image: primary.acquire_image.or(secondary.acquire_image),
            queue_present: primary.queue_present.or(secondary.queue_present),
        }
    }

    /// Get the queue submission slot
    pub fn queue_submit(&self) -> Option<QueueSubmitFn> {
        self.queue_submit
    }

    /// Get the acquire-image slot
    pub fn acquire_image(&self) -> Option<PresentationFn> {
        self.acquire_image
    }

    /// Get the queue-present slot
    pub fn queue_present(&self) -> Option<PresentationFn> {
        self.queue_present
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

    fn stub_present(_: &Device) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_secondary_fills_gaps() {
        let primary = Entrypoints {
            queue_submit: Some(stub_submit),
            ..Entrypoints::NONE
        };
        let secondary = Entrypoints {
            acquire_image: Some(stub_present),
            queue_present: Some(stub_present),
            ..Entrypoints::NONE
        };
        let table = DispatchTable::from_entrypoints(&primary, &secondary);
        assert!(table.queue_submit().is_some());
        assert!(table.acquire_image().is_some());
        assert!(table.queue_present().is_some());
    }

    #[test]
    fn test_empty_layers_leave_empty_slots() {
        let table = DispatchTable::from_entrypoints(&Entrypoints::NONE, &Entrypoints::NONE);
        assert!(table.queue_submit().is_none());
        assert!(table.acquire_image().is_none());
        assert!(table.queue_present().is_none());
    }
}
