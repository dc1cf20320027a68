//! # Scoria Device Layer
//!
//! The logical device of the submission core: staged fallible creation,
//! dispatch-table install, one hardware queue context per device, and the
//! serialized submit protocol that coordinates command-buffer pushes with
//! sync-object signaling.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        scoria-device                              │
//! │                                                                   │
//! │  ┌─────────────────────────────────────────────────────────────┐  │
//! │  │        Entry Points (Device::create / destroy_device)       │  │
//! │  └──────────────────────────────┬──────────────────────────────┘  │
//! │                                 │                                 │
//! │  ┌──────────────┐  ┌────────────┴───────┐  ┌──────────────────┐  │
//! │  │  Dispatch    │  │      Device        │  │  Logical Queue   │  │
//! │  │  (merged     │  │  lock + condvar +  │  │  (driver_submit  │  │
//! │  │  entrypoints)│  │  queue context     │  │   binding)       │  │
//! │  └──────────────┘  └────────────┬───────┘  └──────────────────┘  │
//! │                                 │                                 │
//! │  ┌─────────────────────────────────────────────────────────────┐  │
//! │  │              scoria-core / scoria-cmd                       │  │
//! │  └─────────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate requires `std`: the submission lock and completion
//! broadcast are a mutex/condvar monitor, and condvar timed waits run
//! against the monotonic clock.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod device;
pub mod dispatch;
pub mod queue;
pub mod result;
pub mod submit;

// Re-exports
pub use device::{destroy_device, Device, DeviceCreateInfo};
pub use dispatch::{DispatchTable, Entrypoints, PresentationFn, QueueSubmitFn};
pub use queue::{Queue, QueueCreateInfo, QueueFlags};
pub use result::CreateDeviceError;
pub use submit::SubmitBatch;
