//! # The Concurrency Core
//!
//! This module defines the two synchronization primitives the service is
//! built around.
//!
//! ## Key Types
//!
//! - [`OrderQueue`]: a bounded FIFO mailbox with admission control. Producers
//!   block when the queue is full, consumers block when it is empty.
//! - [`StartGate`]: a one-shot quorum gate. Workers are released to drain the
//!   queue only after a fixed number of participants have arrived.
//!
//! Everything here is shared by `Arc` and safe to call from any task.

pub mod gate;
pub mod queue;

pub use gate::{GateError, StartGate};
pub use queue::{OrderQueue, QueueClosed};
