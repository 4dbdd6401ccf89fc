//! Error types for catalog reservations.

use thiserror::Error;

/// Reasons a reservation is rejected. A rejection never mutates stock.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested product does not exist in the catalog.
    #[error("Product not found: {0}")]
    UnknownProduct(String),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// The provided quantity is invalid (zero).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
}
