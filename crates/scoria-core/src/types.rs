//! # Scoria Core Types
//!
//! Fundamental type definitions shared across the submission core.
//!
//! These types provide:
//! - Type-safe opaque handles that cannot be mixed between resource kinds
//! - Access-mode flags for resource references on a push stream

use core::fmt;

// =============================================================================
// HANDLE TYPES
// =============================================================================

/// Opaque handle to a GPU resource
///
/// Handles are type-safe wrappers that prevent mixing different resource
/// types. The submission core never dereferences a handle; ownership of
/// the underlying resource stays with the collaborator that created it.
#[repr(transparent)]
pub struct Handle<T> {
    id: u64,
    _marker: core::marker::PhantomData<T>,
}

// Implemented by hand: derives would bound these on `T`, and the marker
// is phantom with no trait impls of its own.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> core::hash::Hash for Handle<T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Handle<T> {
    /// Create a new handle
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _marker: core::marker::PhantomData,
        }
    }

    /// Create a null handle
    #[inline]
    pub const fn null() -> Self {
        Self::new(0)
    }

    /// Get the raw ID
    #[inline]
    pub const fn id(self) -> u64 {
        self.id
    }

    /// Check if null
    #[inline]
    pub const fn is_null(self) -> bool {
        self.id == 0
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle<{}>(0x{:x})",
            core::any::type_name::<T>(),
            self.id
        )
    }
}

// Marker types for handles
/// Marker for buffer-object handles
pub struct BoMarker;
/// Marker for hardware channel handles
pub struct ChannelMarker;

/// Handle to a buffer object
pub type BoHandle = Handle<BoMarker>;
/// Handle to a hardware channel
pub type ChannelId = Handle<ChannelMarker>;

// =============================================================================
// ACCESS FLAGS
// =============================================================================

bitflags::bitflags! {
    /// Access mode for a buffer object referenced by a push stream
    ///
    /// The hardware dependency tracker uses these to order submissions
    /// whose memory footprints overlap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BoAccess: u32 {
        /// Resource is read by the submission
        const RD = 1 << 0;
        /// Resource is written by the submission
        const WR = 1 << 1;
        /// Resource is read and written
        const RDWR = Self::RD.bits() | Self::WR.bits();
    }
}

// =============================================================================
// STATIC ASSERTIONS
// =============================================================================

// Ensure key types are Send + Sync
static_assertions::assert_impl_all!(BoHandle: Send, Sync, Copy);
static_assertions::assert_impl_all!(ChannelId: Send, Sync, Copy);
static_assertions::assert_impl_all!(BoAccess: Send, Sync, Copy);

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_null() {
        let h = BoHandle::null();
        assert!(h.is_null());
        assert_eq!(h.id(), 0);
    }

    #[test]
    fn test_handle_identity() {
        let a = BoHandle::new(7);
        let b = BoHandle::new(7);
        let c = BoHandle::new(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_handle_traits_need_no_marker_impls() {
        struct Bare;

        let a = Handle::<Bare>::new(5);
        let b = a;
        assert_eq!(a, b);
        assert!(a < Handle::<Bare>::new(6));
        assert!(!a.is_null());
    }

    #[test]
    fn test_access_rdwr_covers_both() {
        assert!(BoAccess::RDWR.contains(BoAccess::RD));
        assert!(BoAccess::RDWR.contains(BoAccess::WR));
    }
}
