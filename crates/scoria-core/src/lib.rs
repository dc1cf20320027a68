//! # Scoria Core
//!
//! Foundational types for the Scoria GPU submission core.
//!
//! This crate holds everything the submission layer shares with its
//! collaborators: strongly typed resource handles, the unified error
//! taxonomy, the physical-device descriptor with its channel-slot
//! accounting, and the BO sync-object state machine.
//!
//! ## Design Principles
//!
//! 1. **Strong Typing**: handles and access modes are distinct types,
//!    not bare integers
//! 2. **Explicit State Machines**: sync objects have a checked lifecycle,
//!    not an implicit one
//! 3. **Lock-Free Core**: this crate uses atomics only; blocking
//!    primitives live in the device layer
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      scoria-core                            │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Types     │  │    Gpu      │  │       Sync          │  │
//! │  │ (Handle,    │  │ (Physical   │  │  (BoSync state      │  │
//! │  │  BoAccess)  │  │  Device)    │  │   machine)          │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod error;
pub mod gpu;
pub mod sync;
pub mod types;

// Re-exports for convenience
pub use error::{Error, Result};
pub use gpu::{ChannelSlot, PhysicalDevice};
pub use sync::{BoSync, SyncHandle, SyncState};
pub use types::*;
