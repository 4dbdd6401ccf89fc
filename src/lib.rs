//! # Order Central
//!
//! > **A concurrent order-intake service in Rust.**
//!
//! Clients connect over TCP, browse a fixed product catalog, and submit
//! quantity-bounded orders. Accepted orders land on a shared bounded queue and
//! are drained asynchronously by a fixed-size worker pool.
//!
//! ## 🏗️ Design Philosophy
//!
//! The interesting part of this service is not the wire protocol (plain text
//! lines) but the **order-queue and worker-synchronization core**. Three
//! hazards shape the design:
//!
//! - **Lost updates on stock**: two sessions racing to buy the last units of a
//!   product must never oversell. The catalog's check-and-decrement is a
//!   single exclusive operation.
//! - **Capacity overrun**: the pending-order queue is bounded. A producer that
//!   cannot get a slot blocks (backpressure), it never drops or errors.
//! - **Deadlock-prone gating**: workers must not start draining the queue
//!   until a quorum of client sessions has arrived, and a session that
//!   disconnects mid-wait must break the gate rather than strand everyone.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`core`])
//! The concurrency primitives everything else is built on.
//! - **Key items**: [`OrderQueue`](core::OrderQueue) (semaphore-admitted
//!   bounded FIFO), [`StartGate`](core::StartGate) (one-shot quorum gate).
//!
//! ### 2. The Ledger ([`catalog`])
//! Mutable stock behind an exclusive lock.
//! - **Key items**: [`CatalogStore`](catalog::CatalogStore),
//!   [`ReserveError`](catalog::ReserveError).
//!
//! ### 3. The Consumers ([`worker`], [`fulfillment`])
//! Long-lived tasks that block on the gate, then loop on the queue.
//! - **Key items**: [`WorkerPool`](worker::WorkerPool),
//!   [`Fulfillment`](fulfillment::Fulfillment).
//!
//! ### 4. The Interface ([`net`])
//! The per-connection menu protocol and the acceptor loop. Thin I/O; it only
//! calls into the core through three operations: `check_and_reserve`,
//! `enqueue`, and `list`.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Wires the pieces together, owns the worker handles, and coordinates
//! shutdown.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the server with info logs
//! RUST_LOG=info cargo run --bin central
//!
//! # In another terminal, connect interactively
//! cargo run --bin central-client
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod fulfillment;
pub mod lifecycle;
pub mod model;
pub mod net;
pub mod worker;
