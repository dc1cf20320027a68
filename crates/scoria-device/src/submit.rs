//! # Queue Submission
//!
//! The serialized submit protocol.
//!
//! Every submission on a device runs under the device's submission lock,
//! start to finish. Under the lock, the protocol walks the batch in
//! order: each signal sync's buffer object is referenced into the command
//! buffer's push stream for read-write access, the push is handed to the
//! hardware channel, and one-shot buffers are reset the moment their push
//! returns. Only after every push is accepted do the signal syncs
//! transition to `Submitted`, so an observer that sees `Submitted` knows
//! the whole batch is on the channel. The protocol ends with a broadcast
//! on the device's submission signal.

use std::sync::Arc;

use scoria_core::{BoAccess, BoSync, Error, Result, SyncHandle};

use scoria_cmd::{CommandBuffer, CommandBufferState};

use crate::device::Device;

// =============================================================================
// SUBMIT BATCH
// =============================================================================

/// One batch of work handed to the queue
///
/// Command buffers are pushed in slice order. Every signal handle must be
/// a BO sync in the `Reset` state; the submit protocol aborts on anything
/// else, because a misarmed sync would let completion tracking lie.
pub struct SubmitBatch<'a> {
    /// Command buffers to push, in order; all must be executable
    pub command_buffers: &'a mut [CommandBuffer],
    /// Sync objects to transition to `Submitted` once the batch is pushed
    pub signals: &'a [Arc<dyn SyncHandle>],
}

// =============================================================================
// SUBMIT PROTOCOL
// =============================================================================

impl Device {
    /// Submit a batch of command buffers to the device's queue
    ///
    /// Routes through the logical queue's driver binding. Blocks until
    /// the hardware channel has accepted every push, not until the work
    /// executes; completion is observed through the signal syncs.
    pub fn submit(&self, batch: &mut SubmitBatch<'_>) -> Result<()> {
        self.queue().submit(self, batch)
    }

    /// The driver's queue-submission routine
    ///
    /// Installed in the dispatch table and bound to the logical queue at
    /// device creation. A push rejected by the channel surfaces as a
    /// recoverable error: no sync transitions, no broadcast, and the
    /// caller may retry the batch. Earlier pushes of the batch stay on
    /// the channel in that case.
    pub(crate) fn driver_submit(device: &Device, batch: &mut SubmitBatch<'_>) -> Result<()> {
        // Signal handles must be the driver's own sync representation.
        let syncs: Vec<&BoSync> = batch
            .signals
            .iter()
            .map(|s| match s.as_bo_sync() {
                Some(sync) => sync,
                None => panic!("submit signal is not a BO sync"),
            })
            .collect();

        let mut state = device.lock_submit_state();

        // Reject the batch before touching the channel
        for cmd in batch.command_buffers.iter() {
            if cmd.state() != CommandBufferState::Executable {
                log::warn!(
                    "channel {:?}: rejecting batch, command buffer in state {:?}",
                    state.ctx.id(),
                    cmd.state()
                );
                return Err(Error::SubmissionFailed);
            }
        }

        for cmd in batch.command_buffers.iter_mut() {
            // Reference every signal BO for read-write so the hardware
            // dependency tracker orders overlapping work against this push
            for sync in &syncs {
                cmd.push_mut().ref_bo(sync.bo(), BoAccess::RDWR);
            }

            state.ctx.push_submit(cmd.push())?;

            if cmd.reset_on_submit() {
                cmd.reset();
            }
        }

        // Every push is on the channel; now the signals may say so
        for sync in &syncs {
            sync.mark_submitted();
        }

        state.submissions += 1;
        log::trace!(
            "channel {:?}: submission #{} complete ({} buffers, {} signals)",
            state.ctx.id(),
            state.submissions,
            batch.command_buffers.len(),
            syncs.len()
        );

        drop(state);
        device.broadcast_submit();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
