//! # Command Buffers
//!
//! An opaque, resettable unit of recorded work.
//!
//! The submission core needs three things from a command buffer: its push
//! stream, its reset-on-submit flag, and the ability to reset it back to
//! a recordable state. Everything else about recording is a collaborator
//! concern.

use scoria_core::{Error, Result};

use crate::pushbuf::PushStream;

// =============================================================================
// COMMAND BUFFER STATE
// =============================================================================

/// Recording lifecycle of a command buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandBufferState {
    /// Freshly created or reset, nothing recorded
    Initial,
    /// Recording in progress
    Recording,
    /// Recording finished, ready to submit
    Executable,
}

// =============================================================================
// COMMAND BUFFER
// =============================================================================

/// A recorded, submittable unit of work
#[derive(Debug)]
pub struct CommandBuffer {
    /// Recording lifecycle state
    state: CommandBufferState,
    /// Recorded content
    push: PushStream,
    /// Reset immediately after this buffer's push returns (one-shot usage)
    reset_on_submit: bool,
}

impl CommandBuffer {
    /// Create an empty, reusable command buffer
    pub fn new() -> Self {
        Self {
            state: CommandBufferState::Initial,
            push: PushStream::new(),
            reset_on_submit: false,
        }
    }

    /// Create an empty one-shot command buffer
    ///
    /// One-shot buffers are reset by the submit protocol as soon as their
    /// push returns, before the next buffer in the batch is pushed.
    pub fn one_shot() -> Self {
        Self {
            reset_on_submit: true,
            ..Self::new()
        }
    }

    /// Get the recording state
    pub fn state(&self) -> CommandBufferState {
        self.state
    }

    /// Check the reset-on-submit flag
    pub fn reset_on_submit(&self) -> bool {
        self.reset_on_submit
    }

    /// Begin recording
    pub fn begin(&mut self) -> Result<()> {
        if self.state != CommandBufferState::Initial {
            return Err(Error::InvalidState);
        }
        self.state = CommandBufferState::Recording;
        Ok(())
    }

    /// Record one opaque command word
    pub fn emit(&mut self, dword: u32) -> Result<()> {
        if self.state != CommandBufferState::Recording {
            return Err(Error::InvalidState);
        }
        self.push.push(dword)
    }

    /// Finish recording
    pub fn end(&mut self) -> Result<()> {
        if self.state != CommandBufferState::Recording {
            return Err(Error::InvalidState);
        }
        self.state = CommandBufferState::Executable;
        Ok(())
    }

    /// Get the recorded push stream
    pub fn push(&self) -> &PushStream {
        &self.push
    }

    /// Get the push stream for reference declaration
    ///
    /// The submit protocol uses this to attach signal-sync buffer objects
    /// before the push.
    pub fn push_mut(&mut self) -> &mut PushStream {
        &mut self.push
    }

    /// Discard recorded content and return to the initial state
    pub fn reset(&mut self) {
        self.push.clear();
        self.state = CommandBufferState::Initial;
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_lifecycle() {
        let mut cmd = CommandBuffer::new();
        assert_eq!(cmd.state(), CommandBufferState::Initial);
        cmd.begin().unwrap();
        cmd.emit(0x1234).unwrap();
        cmd.end().unwrap();
        assert_eq!(cmd.state(), CommandBufferState::Executable);
        assert_eq!(cmd.push().dwords(), &[0x1234]);
    }

    #[test]
    fn test_emit_outside_recording_fails() {
        let mut cmd = CommandBuffer::new();
        assert_eq!(cmd.emit(1).unwrap_err(), Error::InvalidState);
        cmd.begin().unwrap();
        cmd.end().unwrap();
        assert_eq!(cmd.emit(1).unwrap_err(), Error::InvalidState);
    }

    #[test]
    fn test_double_begin_fails() {
        let mut cmd = CommandBuffer::new();
        cmd.begin().unwrap();
        assert_eq!(cmd.begin().unwrap_err(), Error::InvalidState);
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut cmd = CommandBuffer::one_shot();
        cmd.begin().unwrap();
        cmd.emit(7).unwrap();
        cmd.end().unwrap();
        cmd.reset();
        assert_eq!(cmd.state(), CommandBufferState::Initial);
        assert!(cmd.push().is_empty());
        assert!(cmd.reset_on_submit());
        // Reset buffer records again
        cmd.begin().unwrap();
        cmd.emit(8).unwrap();
        cmd.end().unwrap();
        assert_eq!(cmd.push().dwords(), &[8]);
    }
}
