use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::catalog::CatalogStore;
use crate::config::ServiceConfig;
use crate::core::{OrderQueue, StartGate};
use crate::fulfillment::{Fulfillment, SimulatedFulfillment};
use crate::net::SessionContext;
use crate::worker::WorkerPool;

/// The assembled order-intake service.
///
/// `OrderCentral` owns the shared core (catalog, queue, gate) and the worker
/// pool draining it. The network layer is attached from the outside via
/// [`session_context`](OrderCentral::session_context), which keeps the core
/// testable without any sockets.
///
/// # Example
///
/// ```ignore
/// let config = ServiceConfig::from_env()?;
/// let central = OrderCentral::new(&config);
/// let listener = TcpListener::bind(&config.addr).await?;
/// net::serve(listener, central.session_context()).await?;
/// central.shutdown().await;
/// ```
pub struct OrderCentral {
    /// Stock ledger shared with every session.
    pub catalog: Arc<CatalogStore>,
    /// Bounded pending-order queue shared between sessions and workers.
    pub queue: Arc<OrderQueue>,
    /// Start gate: sessions arrive, workers await.
    pub gate: Arc<StartGate>,
    workers: WorkerPool,
}

impl OrderCentral {
    /// Builds the service with the production fulfillment backend (simulated
    /// random delay within the configured bounds).
    pub fn new(config: &ServiceConfig) -> Self {
        let fulfillment = Arc::new(SimulatedFulfillment::new(
            Duration::from_millis(config.min_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        ));
        Self::with_fulfillment(config, fulfillment)
    }

    /// Builds the service with a caller-supplied fulfillment backend. This is
    /// the seam tests use to make fulfillment instant or fallible.
    pub fn with_fulfillment(config: &ServiceConfig, fulfillment: Arc<dyn Fulfillment>) -> Self {
        let catalog = Arc::new(CatalogStore::new(config.catalog.clone()));
        let queue = Arc::new(OrderQueue::new(config.queue_capacity));
        let gate = Arc::new(StartGate::new(config.start_quorum));

        info!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            start_quorum = config.start_quorum,
            products = config.catalog.len(),
            "Order central assembled"
        );
        let workers = WorkerPool::spawn(config.workers, gate.clone(), queue.clone(), fulfillment);

        Self {
            catalog,
            queue,
            gate,
            workers,
        }
    }

    /// The handle sessions use to reach the core.
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            catalog: self.catalog.clone(),
            queue: self.queue.clone(),
            gate: self.gate.clone(),
        }
    }

    /// Orders fulfilled so far, across the whole pool.
    pub fn fulfilled(&self) -> u64 {
        self.workers.fulfilled()
    }

    /// Shuts the service down and waits for every worker to exit.
    ///
    /// Orders still pending on the queue are discarded; persistence across
    /// restarts is explicitly out of scope.
    pub async fn shutdown(self) {
        info!("Shutting down order central...");

        // Wake workers still parked on a never-opened gate, then fail their
        // dequeues. Both are no-ops for workers already past that point.
        self.gate.abort().await;
        self.queue.close();

        let fulfilled = self.workers.join().await;
        info!(fulfilled, "Shutdown complete");
    }
}
