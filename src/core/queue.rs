//! Bounded, admission-controlled order queue.
//!
//! # Architecture Note
//! Capacity limiting and sequence mutation are two separate concerns composed
//! into one structure:
//!
//! - A counting semaphore (`slots`) is the **admission gate**: a producer must
//!   take a slot permit before it may touch the sequence, so no interleaving
//!   can push the pending count above the configured capacity.
//! - A second semaphore (`items`) counts **ready orders**: a consumer must
//!   take an item permit before popping, so two workers can never pop the
//!   same order and a pop on an empty queue is impossible.
//! - The sequence itself is a `Mutex<VecDeque>`; every append/remove happens
//!   inside that exclusive region.
//!
//! A slot permit is handed back only when the matching **real** order has been
//! removed by a consumer, never earlier and never for anything synthetic.
//! Start-up signalling lives in [`StartGate`](crate::core::StartGate) instead
//! of sentinel elements on the queue, which keeps the FIFO guarantee about
//! actual orders intact.

use std::collections::VecDeque;

use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tracing::debug;

use crate::model::Order;

/// The queue was closed while the caller was blocked on it (or before the
/// call). Only shutdown closes the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order queue closed")]
pub struct QueueClosed;

/// A bounded FIFO mailbox of pending orders.
///
/// `enqueue` blocks while the queue is at capacity (backpressure, not a
/// fault); `dequeue` blocks while it is empty. FIFO order between admitted
/// orders is preserved, and the number of admitted-but-not-yet-dequeued
/// orders never exceeds the capacity.
pub struct OrderQueue {
    /// Free capacity. Starts at `capacity`, replenished once per dequeue.
    slots: Semaphore,
    /// Ready orders. Starts at zero, minted once per completed enqueue.
    items: Semaphore,
    inner: Mutex<VecDeque<Order>>,
    capacity: usize,
}

impl OrderQueue {
    /// Creates a queue admitting at most `capacity` pending orders.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Semaphore::new(capacity),
            items: Semaphore::new(0),
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of orders currently pending. Snapshot only; it may be stale by
    /// the time the caller looks at it.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Appends `order` to the tail, blocking until a capacity slot is free.
    ///
    /// An admitted order is never dropped or reordered. Returns
    /// [`QueueClosed`] only if the queue was shut down.
    pub async fn enqueue(&self, order: Order) -> Result<(), QueueClosed> {
        // Admission first: holding a slot permit guarantees a place in the
        // sequence, so the push below cannot overshoot capacity.
        let permit = self.slots.acquire().await.map_err(|_| QueueClosed)?;
        permit.forget();

        let pending = {
            let mut queue = self.inner.lock().await;
            queue.push_back(order);
            queue.len()
        };
        debug!(pending, "Order enqueued");

        // The order is in place; make it visible to exactly one consumer.
        self.items.add_permits(1);
        Ok(())
    }

    /// Removes and returns the head order, blocking until one is present.
    ///
    /// Frees exactly one capacity slot per returned order. Returns
    /// [`QueueClosed`] once the queue is shut down.
    pub async fn dequeue(&self) -> Result<Order, QueueClosed> {
        let permit = self.items.acquire().await.map_err(|_| QueueClosed)?;
        permit.forget();

        let (order, pending) = {
            let mut queue = self.inner.lock().await;
            let order = match queue.pop_front() {
                Some(order) => order,
                // An item permit is minted only after the matching push.
                None => unreachable!("item permit held over an empty queue"),
            };
            (order, queue.len())
        };
        debug!(pending, "Order dequeued");

        // The slot is free again; hand it to a future producer exactly once.
        self.slots.add_permits(1);
        Ok(order)
    }

    /// Shuts the queue down: every blocked or future `enqueue`/`dequeue`
    /// fails with [`QueueClosed`].
    ///
    /// Orders still pending at close are discarded with the process; the
    /// service makes no persistence promise.
    pub fn close(&self) {
        self.slots.close();
        self.items.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn order(product: &str, quantity: u32) -> Order {
        let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        Order::new(peer, product, quantity)
    }

    #[tokio::test]
    async fn fifo_between_admitted_orders() {
        let queue = OrderQueue::new(4);
        queue.enqueue(order("A", 1)).await.unwrap();
        queue.enqueue(order("B", 2)).await.unwrap();

        assert_eq!(queue.dequeue().await.unwrap().product, "A");
        assert_eq!(queue.dequeue().await.unwrap().product, "B");
    }

    #[tokio::test]
    async fn dequeue_blocks_until_an_order_arrives() {
        let queue = Arc::new(OrderQueue::new(2));

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };

        // The consumer must still be parked: nothing has been enqueued.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!consumer.is_finished());

        queue.enqueue(order("A", 1)).await.unwrap();
        let got = timeout(Duration::from_secs(1), consumer)
            .await
            .expect("consumer should wake after enqueue")
            .unwrap()
            .unwrap();
        assert_eq!(got.product, "A");
    }

    #[tokio::test]
    async fn close_wakes_blocked_consumers() {
        let queue = Arc::new(OrderQueue::new(1));

        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.dequeue().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        queue.close();
        let result = timeout(Duration::from_secs(1), consumer)
            .await
            .expect("close should wake the consumer")
            .unwrap();
        assert_eq!(result, Err(QueueClosed));

        assert_eq!(queue.enqueue(order("A", 1)).await, Err(QueueClosed));
    }
}
