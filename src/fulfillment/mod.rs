//! # Fulfillment
//!
//! The seam between the worker pool and whatever "processing an order"
//! actually means. Production uses [`SimulatedFulfillment`], which sleeps for
//! a random bounded duration; tests substitute instant or failing
//! implementations without touching the pool.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::model::Order;

/// A fulfillment attempt failed. Worker-local: the pool logs it and moves on
/// to the next order; it is never fatal to the pool.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fulfillment failed: {0}")]
pub struct FulfillError(pub String);

/// How a worker processes one dequeued order.
#[async_trait]
pub trait Fulfillment: Send + Sync + 'static {
    async fn fulfill(&self, order: &Order) -> Result<(), FulfillError>;
}

/// Simulates fulfillment work with a uniformly random delay in
/// `[min_delay, max_delay]`.
pub struct SimulatedFulfillment {
    min_delay: Duration,
    max_delay: Duration,
}

impl SimulatedFulfillment {
    /// Delay bounds are inclusive; `max_delay` is clamped up to `min_delay`
    /// if the caller inverts them.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }
}

#[async_trait]
impl Fulfillment for SimulatedFulfillment {
    async fn fulfill(&self, order: &Order) -> Result<(), FulfillError> {
        // Draw before the await: the thread-local RNG is not Send.
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min_delay..=self.max_delay)
        };
        debug!(product = %order.product, ?delay, "Simulating fulfillment work");
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
