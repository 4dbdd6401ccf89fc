//! Capacity, blocking, and ordering properties of the bounded order queue.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use order_central::core::OrderQueue;
use order_central::model::Order;
use tokio::time::timeout;

fn order(product: &str, quantity: u32) -> Order {
    let peer: SocketAddr = "127.0.0.1:4000".parse().unwrap();
    Order::new(peer, product, quantity)
}

/// A full queue (N=2) blocks the third enqueue until exactly one dequeue
/// frees a slot.
#[tokio::test]
async fn full_queue_blocks_third_enqueue_until_a_dequeue() {
    let queue = Arc::new(OrderQueue::new(2));
    queue.enqueue(order("A", 1)).await.unwrap();
    queue.enqueue(order("B", 1)).await.unwrap();

    let blocked = {
        let queue = queue.clone();
        tokio::spawn(async move { queue.enqueue(order("C", 1)).await })
    };

    // Still at capacity: the third producer must be parked, not erroring
    // and not dropping the order.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!blocked.is_finished(), "enqueue must block while full");
    assert_eq!(queue.len().await, 2);

    // One dequeue frees exactly one slot; the parked producer completes.
    assert_eq!(queue.dequeue().await.unwrap().product, "A");
    timeout(Duration::from_secs(1), blocked)
        .await
        .expect("blocked enqueue should complete after a dequeue")
        .unwrap()
        .unwrap();

    // FIFO held across the blocking producer.
    assert_eq!(queue.dequeue().await.unwrap().product, "B");
    assert_eq!(queue.dequeue().await.unwrap().product, "C");
}

/// Pending count never exceeds capacity under concurrent producers and
/// consumers, and every admitted order comes out exactly once.
#[tokio::test]
async fn pending_never_exceeds_capacity_under_contention() {
    const CAPACITY: usize = 5;
    const PRODUCERS: usize = 8;
    const PER_PRODUCER: usize = 25;

    let queue = Arc::new(OrderQueue::new(CAPACITY));

    let mut producers = vec![];
    for p in 0..PRODUCERS {
        let queue = queue.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..PER_PRODUCER {
                queue
                    .enqueue(order(&format!("P{p}-{i}"), 1))
                    .await
                    .unwrap();
            }
        }));
    }

    // A watchdog samples the queue depth the whole time; violations are
    // recorded and asserted from the test task.
    let overrun = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let watchdog = {
        let queue = queue.clone();
        let overrun = overrun.clone();
        tokio::spawn(async move {
            loop {
                if queue.len().await > CAPACITY {
                    overrun.store(true, std::sync::atomic::Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_micros(200)).await;
            }
        })
    };

    let consumer = {
        let queue = queue.clone();
        tokio::spawn(async move {
            let mut seen = vec![];
            for _ in 0..(PRODUCERS * PER_PRODUCER) {
                seen.push(queue.dequeue().await.unwrap());
            }
            seen
        })
    };

    for producer in producers {
        producer.await.unwrap();
    }
    let seen = timeout(Duration::from_secs(5), consumer)
        .await
        .expect("all admitted orders must eventually drain")
        .unwrap();
    watchdog.abort();

    assert!(
        !overrun.load(std::sync::atomic::Ordering::SeqCst),
        "pending exceeded capacity"
    );
    assert_eq!(seen.len(), PRODUCERS * PER_PRODUCER);
    assert!(queue.is_empty().await);

    // Per-producer FIFO: each producer fully queued order i before
    // attempting i+1, so its orders must drain in submission order.
    for p in 0..PRODUCERS {
        let drained: Vec<&str> = seen
            .iter()
            .map(|o| o.product.as_str())
            .filter(|name| name.starts_with(&format!("P{p}-")))
            .collect();
        let expected: Vec<String> = (0..PER_PRODUCER).map(|i| format!("P{p}-{i}")).collect();
        assert_eq!(drained, expected, "producer {p} orders drained out of order");
    }
}
