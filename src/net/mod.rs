//! # The Interface
//!
//! Thin I/O around the core: a TCP acceptor loop and the per-connection
//! line-based menu protocol. Sessions reach the core through exactly three
//! calls - `CatalogStore::check_and_reserve`, `OrderQueue::enqueue`, and
//! `CatalogStore::list` - plus the start-gate arrival made on connect.

pub mod server;
pub mod session;

pub use server::serve;
pub use session::{SessionContext, SessionError};
