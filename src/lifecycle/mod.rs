//! # System Lifecycle & Orchestration
//!
//! Individual pieces of the service are simple; **wiring them together** is
//! where the complexity lives. This module is the conductor:
//!
//! 1. **Construction** - build the catalog, queue, and gate from a
//!    [`ServiceConfig`](crate::config::ServiceConfig).
//! 2. **Worker startup** - spawn the pool; workers park on the gate until
//!    the session quorum forms.
//! 3. **Shutdown** - abort a never-opened gate, close the queue, and join
//!    every worker.
//! 4. **Observability setup** - [`setup_tracing`] initializes structured
//!    logging for the whole process.

pub mod order_central;
pub mod tracing;

pub use order_central::*;
pub use tracing::*;
