//! # Worker Pool
//!
//! A fixed set of long-lived, symmetric fulfillment tasks.
//!
//! Each worker:
//! 1. Blocks until the [`StartGate`] opens (a broken gate is fatal to the
//!    worker - it reports and exits, there is nothing to retry).
//! 2. Loops: blocks on [`OrderQueue::dequeue`], fulfills the order, reports
//!    completion. A fulfillment fault is logged and the loop continues.
//! 3. Exits only when the queue is closed at shutdown.
//!
//! No worker has priority over another; the queue's atomic dequeue guarantees
//! no two workers ever receive the same order. Workers may *finish* out of
//! submission order - only admission-to-consumption is FIFO.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::{OrderQueue, StartGate};
use crate::fulfillment::Fulfillment;

/// Handles and counters for a running pool of workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    fulfilled: Arc<AtomicU64>,
}

impl WorkerPool {
    /// Spawns `count` workers that wait on `gate`, then drain `queue` through
    /// `fulfillment`.
    pub fn spawn(
        count: usize,
        gate: Arc<StartGate>,
        queue: Arc<OrderQueue>,
        fulfillment: Arc<dyn Fulfillment>,
    ) -> Self {
        let fulfilled = Arc::new(AtomicU64::new(0));
        let handles = (0..count)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    gate.clone(),
                    queue.clone(),
                    fulfillment.clone(),
                    fulfilled.clone(),
                ))
            })
            .collect();
        Self { handles, fulfilled }
    }

    /// Number of orders fulfilled so far, across all workers.
    pub fn fulfilled(&self) -> u64 {
        self.fulfilled.load(Ordering::SeqCst)
    }

    /// Waits for every worker to exit and returns the final fulfilled count.
    /// Workers only exit on queue closure or a broken gate, so call this
    /// after [`OrderQueue::close`].
    pub async fn join(self) -> u64 {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Worker task failed: {:?}", e);
            }
        }
        self.fulfilled.load(Ordering::SeqCst)
    }
}

async fn run_worker(
    worker: usize,
    gate: Arc<StartGate>,
    queue: Arc<OrderQueue>,
    fulfillment: Arc<dyn Fulfillment>,
    fulfilled: Arc<AtomicU64>,
) {
    info!(worker, "Worker waiting for start gate");
    if let Err(e) = gate.await_open().await {
        // Coordination fault: the one-shot gate cannot be reset mid-flight,
        // so the worker reports and exits for process-level recovery.
        error!(worker, error = %e, "Start gate broken; worker exiting");
        return;
    }
    info!(worker, "Worker released");

    loop {
        let order = match queue.dequeue().await {
            Ok(order) => order,
            Err(_) => {
                info!(worker, "Order queue closed; worker exiting");
                break;
            }
        };

        match fulfillment.fulfill(&order).await {
            Ok(()) => {
                let total = fulfilled.fetch_add(1, Ordering::SeqCst) + 1;
                info!(
                    worker,
                    requester = %order.requester,
                    product = %order.product,
                    quantity = order.quantity,
                    total,
                    "Order fulfilled"
                );
            }
            Err(e) => {
                // Worker-local fault: drop the order, keep the worker alive.
                warn!(
                    worker,
                    product = %order.product,
                    error = %e,
                    "Fulfillment failed; continuing with next order"
                );
            }
        }
    }
}
