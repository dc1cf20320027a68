//! # Hardware Queue Context
//!
//! The driver's live handle to one hardware execution channel.
//!
//! A queue context is created once per logical device and owned
//! exclusively by it; every access happens under the device's submission
//! lock. `push_submit` blocks only until the hardware accepts the push,
//! never until execution completes.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use scoria_core::{ChannelId, ChannelSlot, Error, PhysicalDevice, Result};

use crate::pushbuf::{BoRef, PushStream};

// =============================================================================
// CHANNEL STATE
// =============================================================================

/// Hardware channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Channel accepts pushes
    Ready,
    /// Channel torn down, pushes are rejected
    Closed,
}

// =============================================================================
// SUBMITTED PUSH
// =============================================================================

/// One push accepted by the channel, in acceptance order
#[derive(Debug, Clone)]
pub struct SubmittedPush {
    /// Channel-wide acceptance sequence number
    pub seq: u64,
    /// Command words of the push
    pub dwords: Vec<u32>,
    /// Resource references declared on the push
    pub refs: Vec<BoRef>,
}

// =============================================================================
// QUEUE CONTEXT
// =============================================================================

/// Channel identifiers are process-unique
static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// A hardware execution channel
#[derive(Debug)]
pub struct QueueContext {
    /// Channel identifier
    id: ChannelId,
    /// Slot acquired from the physical device, released on drop
    slot: ChannelSlot,
    /// Channel state
    state: ChannelState,
    /// Next acceptance sequence number
    next_seq: u64,
    /// Accepted pushes, in order
    log: Vec<SubmittedPush>,
}

impl QueueContext {
    /// Create a channel on a physical device
    ///
    /// Consumes one channel slot; fails with [`Error::TooManyChannels`]
    /// when the device's hard cap is reached. The slot is released when
    /// the context is dropped.
    pub fn create(pdev: &Arc<PhysicalDevice>) -> Result<Self> {
        let slot = pdev.acquire_channel()?;
        let id = ChannelId::new(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed));
        log::debug!("{}: created queue context {:?}", pdev.name(), id);

        Ok(Self {
            id,
            slot,
            state: ChannelState::Ready,
            next_seq: 0,
            log: Vec::new(),
        })
    }

    /// Get the channel identifier
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Get the channel state
    pub fn state(&self) -> ChannelState {
        self.state
    }

    /// Get the physical device this channel executes on
    pub fn physical_device(&self) -> &Arc<PhysicalDevice> {
        self.slot.physical_device()
    }

    /// Push a recorded stream to the channel
    ///
    /// Returns the acceptance sequence number. Blocks until the push is
    /// accepted, not until it executes; completion is observed through
    /// sync objects.
    pub fn push_submit(&mut self, push: &PushStream) -> Result<u64> {
        if self.state != ChannelState::Ready {
            return Err(Error::InvalidState);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.log.push(SubmittedPush {
            seq,
            dwords: push.dwords().to_vec(),
            refs: push.refs().to_vec(),
        });

        log::trace!(
            "channel {:?}: accepted push #{} ({} words, {} refs)",
            self.id,
            seq,
            push.len(),
            push.refs().len()
        );
        Ok(seq)
    }

    /// Accepted pushes, in acceptance order
    ///
    /// Read by the completion-detection path and by tests asserting push
    /// ordering.
    pub fn submissions(&self) -> &[SubmittedPush] {
        &self.log
    }

    /// Number of pushes accepted so far
    pub fn submission_count(&self) -> u64 {
        self.next_seq
    }

    /// Stop accepting pushes
    pub fn close(&mut self) {
        self.state = ChannelState::Closed;
    }
}

impl Drop for QueueContext {
    fn drop(&mut self) {
        log::debug!(
            "{}: destroying queue context {:?} after {} pushes",
            self.slot.physical_device().name(),
            self.id,
            self.next_seq
        );
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scoria_core::{BoAccess, BoHandle};

    fn pdev(max_channels: u32) -> Arc<PhysicalDevice> {
        Arc::new(PhysicalDevice::new("test-gpu", 0x10DE, 0x2684, max_channels))
    }

    #[test]
    fn test_create_respects_channel_cap() {
        let dev = pdev(1);
        let ctx = QueueContext::create(&dev).unwrap();
        assert_eq!(
            QueueContext::create(&dev).unwrap_err(),
            Error::TooManyChannels
        );
        drop(ctx);
        assert!(QueueContext::create(&dev).is_ok());
    }

    #[test]
    fn test_push_sequence_is_ordered() {
        let dev = pdev(1);
        let mut ctx = QueueContext::create(&dev).unwrap();

        let mut push = PushStream::new();
        push.push(0xAA).unwrap();
        push.ref_bo(BoHandle::new(9), BoAccess::RDWR);

        assert_eq!(ctx.push_submit(&push).unwrap(), 0);
        assert_eq!(ctx.push_submit(&push).unwrap(), 1);
        assert_eq!(ctx.submission_count(), 2);

        let log = ctx.submissions();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].seq, 0);
        assert_eq!(log[1].seq, 1);
        assert_eq!(log[0].dwords, &[0xAA]);
        assert_eq!(log[0].refs[0].bo, BoHandle::new(9));
    }

    #[test]
    fn test_closed_channel_rejects_pushes() {
        let dev = pdev(1);
        let mut ctx = QueueContext::create(&dev).unwrap();
        ctx.close();
        let push = PushStream::new();
        assert_eq!(ctx.push_submit(&push).unwrap_err(), Error::InvalidState);
        assert_eq!(ctx.submission_count(), 0);
    }

    #[test]
    fn test_drop_releases_slot() {
        let dev = pdev(1);
        {
            let _ctx = QueueContext::create(&dev).unwrap();
            assert_eq!(dev.active_channels(), 1);
        }
        assert_eq!(dev.active_channels(), 0);
    }
}
