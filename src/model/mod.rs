//! Pure data structures shared across the service.

pub mod order;

pub use order::*;
