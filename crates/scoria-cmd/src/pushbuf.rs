//! # Push Streams
//!
//! The recorded content of a command buffer: a stream of opaque command
//! words plus the buffer objects the stream touches.
//!
//! Resource references exist for the hardware dependency tracker: every
//! buffer object a submission reads or writes is declared on the stream
//! before the push, so overlapping submissions are ordered by hardware.

use alloc::vec::Vec;

use scoria_core::{BoAccess, BoHandle, Error, Result};

// =============================================================================
// LIMITS
// =============================================================================

/// Maximum command words one stream may record
///
/// Matches a 256 KiB push buffer of 32-bit methods.
pub const MAX_PUSH_DWORDS: usize = 64 * 1024;

// =============================================================================
// RESOURCE REFERENCE
// =============================================================================

/// A buffer object referenced by a push stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoRef {
    /// Referenced buffer object
    pub bo: BoHandle,
    /// Declared access mode
    pub access: BoAccess,
}

// =============================================================================
// PUSH STREAM
// =============================================================================

/// Recorded command words and their resource references
#[derive(Debug, Clone, Default)]
pub struct PushStream {
    /// Opaque command words, in push order
    dwords: Vec<u32>,
    /// Referenced buffer objects
    refs: Vec<BoRef>,
}

impl PushStream {
    /// Create an empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one command word
    pub fn push(&mut self, dword: u32) -> Result<()> {
        if self.dwords.len() >= MAX_PUSH_DWORDS {
            return Err(Error::PushBufferFull);
        }
        self.dwords.push(dword);
        Ok(())
    }

    /// Declare a buffer object as referenced by this stream
    ///
    /// Re-referencing an already declared buffer object widens its access
    /// mode instead of adding a duplicate entry.
    pub fn ref_bo(&mut self, bo: BoHandle, access: BoAccess) {
        if let Some(existing) = self.refs.iter_mut().find(|r| r.bo == bo) {
            existing.access |= access;
            return;
        }
        self.refs.push(BoRef { bo, access });
    }

    /// Get the recorded command words
    pub fn dwords(&self) -> &[u32] {
        &self.dwords
    }

    /// Get the declared resource references
    pub fn refs(&self) -> &[BoRef] {
        &self.refs
    }

    /// Number of recorded command words
    pub fn len(&self) -> usize {
        self.dwords.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.dwords.is_empty() && self.refs.is_empty()
    }

    /// Discard all recorded content and references
    pub fn clear(&mut self) {
        self.dwords.clear();
        self.refs.clear();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_records_in_order() {
        let mut push = PushStream::new();
        push.push(0xA0).unwrap();
        push.push(0xA1).unwrap();
        assert_eq!(push.dwords(), &[0xA0, 0xA1]);
        assert_eq!(push.len(), 2);
    }

    #[test]
    fn test_ref_merge_widens_access() {
        let mut push = PushStream::new();
        let bo = BoHandle::new(3);
        push.ref_bo(bo, BoAccess::RD);
        push.ref_bo(bo, BoAccess::WR);
        assert_eq!(push.refs().len(), 1);
        assert_eq!(push.refs()[0].access, BoAccess::RDWR);
    }

    #[test]
    fn test_distinct_bos_get_distinct_refs() {
        let mut push = PushStream::new();
        push.ref_bo(BoHandle::new(1), BoAccess::RD);
        push.ref_bo(BoHandle::new(2), BoAccess::RDWR);
        assert_eq!(push.refs().len(), 2);
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut push = PushStream::new();
        for i in 0..MAX_PUSH_DWORDS {
            push.push(i as u32).unwrap();
        }
        assert_eq!(push.push(0).unwrap_err(), Error::PushBufferFull);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut push = PushStream::new();
        push.push(1).unwrap();
        push.ref_bo(BoHandle::new(1), BoAccess::RD);
        push.clear();
        assert!(push.is_empty());
    }
}
