//! # Scoria Command Layer
//!
//! Push streams, command buffers, and the hardware queue contexts they are
//! pushed to.
//!
//! ## Submission Flow
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │   Command    │    │    Push      │    │   QueueContext   │
//! │   Buffer     │───▶│   Stream     │───▶│  (hw channel)    │
//! │  (recorded)  │    │ (words+refs) │    │                  │
//! └──────────────┘    └──────────────┘    └──────────────────┘
//! ```
//!
//! 1. A collaborator records commands into a [`CommandBuffer`]
//! 2. The device's submit protocol references each signal sync's buffer
//!    object into the buffer's [`PushStream`]
//! 3. The stream is pushed to the device's [`QueueContext`]
//! 4. A buffer flagged reset-on-submit is reset as soon as its push
//!    returns
//!
//! The content of the command words is opaque to this crate; encoding is
//! an external collaborator's concern.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod buffer;
pub mod channel;
pub mod pushbuf;

// Re-exports
pub use buffer::{CommandBuffer, CommandBufferState};
pub use channel::{ChannelState, QueueContext, SubmittedPush};
pub use pushbuf::{BoRef, PushStream, MAX_PUSH_DWORDS};
