//! The [`Order`] record that flows from a session to a worker.

use std::net::SocketAddr;

/// A confirmed order awaiting fulfillment.
///
/// Constructed by a session **after** the catalog has reserved the stock, so
/// an `Order` on the queue always corresponds to units already decremented
/// from the ledger. Immutable once built; it is discarded when a worker
/// finishes processing it (no persistence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Peer address of the session that placed the order.
    pub requester: SocketAddr,
    /// Product key, upper-cased by the session layer.
    pub product: String,
    /// Requested quantity. Always positive; zero is rejected at reservation.
    pub quantity: u32,
}

impl Order {
    pub fn new(requester: SocketAddr, product: impl Into<String>, quantity: u32) -> Self {
        Self {
            requester,
            product: product.into(),
            quantity,
        }
    }
}
