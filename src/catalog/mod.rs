//! # Catalog Store
//!
//! The mutable stock ledger. All reads and writes funnel through one
//! exclusive region, so the "check" and the "decrement" of a reservation are
//! a single atomic unit and a listing can never observe a half-applied
//! reservation.
//!
//! ## Structure
//!
//! - [`CatalogStore`] - the lock-guarded product → available-quantity map
//! - [`ReserveError`] - rejection reasons; a rejection never mutates stock
//! - [`CatalogEntry`] - one row of a [`CatalogStore::list`] snapshot

pub mod error;

pub use error::ReserveError;

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// One row of a catalog listing snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub product: String,
    pub available: u32,
}

/// The stock ledger, guarded by a single mutex.
///
/// # Architecture Note
/// One coarse exclusive region protects the whole map. Per-product locks
/// would admit more concurrency, but reservations are short (a lookup and a
/// subtraction) and the coarse lock keeps `list` trivially consistent. The
/// trade-off is documented, not load-bearing: correctness only requires that
/// check-and-decrement is atomic per product.
pub struct CatalogStore {
    stock: Mutex<HashMap<String, u32>>,
}

impl CatalogStore {
    /// Creates a store seeded with the given product quantities.
    pub fn new(seed: HashMap<String, u32>) -> Self {
        Self {
            stock: Mutex::new(seed),
        }
    }

    /// Atomically checks availability and reserves `quantity` units of
    /// `product`.
    ///
    /// Succeeds and decrements iff the product exists, `quantity > 0`, and
    /// enough stock is available. On rejection nothing is mutated and the
    /// reason is returned; rejections are reported to the caller, never
    /// retried here.
    pub async fn check_and_reserve(&self, product: &str, quantity: u32) -> Result<(), ReserveError> {
        if quantity == 0 {
            return Err(ReserveError::InvalidQuantity(quantity));
        }

        let mut stock = self.stock.lock().await;
        let available = match stock.get_mut(product) {
            Some(available) => available,
            None => {
                warn!(%product, "Reservation rejected: unknown product");
                return Err(ReserveError::UnknownProduct(product.to_string()));
            }
        };
        if *available < quantity {
            warn!(
                %product,
                requested = quantity,
                available = *available,
                "Reservation rejected: insufficient stock"
            );
            return Err(ReserveError::InsufficientStock {
                requested: quantity,
                available: *available,
            });
        }

        *available -= quantity;
        info!(%product, quantity, remaining = *available, "Stock reserved");
        Ok(())
    }

    /// Returns a consistent snapshot of the whole catalog, sorted by product
    /// key. Taken under the same exclusive region as reservations, so no row
    /// can show a torn value.
    pub async fn list(&self) -> Vec<CatalogEntry> {
        let stock = self.stock.lock().await;
        let mut entries: Vec<CatalogEntry> = stock
            .iter()
            .map(|(product, available)| CatalogEntry {
                product: product.clone(),
                available: *available,
            })
            .collect();
        entries.sort_by(|a, b| a.product.cmp(&b.product));
        debug!(products = entries.len(), "Catalog listed");
        entries
    }

    /// Current availability of one product, if it exists.
    pub async fn available(&self, product: &str) -> Option<u32> {
        self.stock.lock().await.get(product).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store(entries: &[(&str, u32)]) -> CatalogStore {
        CatalogStore::new(
            entries
                .iter()
                .map(|(product, quantity)| (product.to_string(), *quantity))
                .collect(),
        )
    }

    #[tokio::test]
    async fn rejection_leaves_stock_untouched() {
        let catalog = store(&[("PRODUCTX", 3)]);

        let result = catalog.check_and_reserve("PRODUCTX", 5).await;
        assert_eq!(
            result,
            Err(ReserveError::InsufficientStock {
                requested: 5,
                available: 3,
            })
        );
        assert_eq!(catalog.available("PRODUCTX").await, Some(3));
    }

    #[tokio::test]
    async fn unknown_product_and_zero_quantity_are_rejected() {
        let catalog = store(&[("PRODUCT1", 10)]);

        assert_eq!(
            catalog.check_and_reserve("NOPE", 1).await,
            Err(ReserveError::UnknownProduct("NOPE".to_string()))
        );
        assert_eq!(
            catalog.check_and_reserve("PRODUCT1", 0).await,
            Err(ReserveError::InvalidQuantity(0))
        );
        assert_eq!(catalog.available("PRODUCT1").await, Some(10));
    }

    #[tokio::test]
    async fn successful_reservation_decrements() {
        let catalog = store(&[("PRODUCT1", 10)]);

        catalog.check_and_reserve("PRODUCT1", 4).await.unwrap();
        assert_eq!(catalog.available("PRODUCT1").await, Some(6));
    }

    /// Two requests racing for more than half the stock: at most one wins.
    #[tokio::test]
    async fn racing_reservations_never_oversell() {
        let catalog = Arc::new(store(&[("PRODUCT1", 10)]));

        let mut handles = vec![];
        for _ in 0..2 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                catalog.check_and_reserve("PRODUCT1", 6).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1, "exactly one of the two 6-unit requests fits in 10");
        assert_eq!(catalog.available("PRODUCT1").await, Some(4));
    }

    /// Many small racing reservations sum to exactly the initial stock.
    #[tokio::test]
    async fn concurrent_reservations_drain_to_zero() {
        let catalog = Arc::new(store(&[("LIMITED", 20)]));

        let mut handles = vec![];
        for _ in 0..10 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                catalog.check_and_reserve("LIMITED", 2).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(catalog.available("LIMITED").await, Some(0));
    }

    #[tokio::test]
    async fn list_is_a_sorted_snapshot() {
        let catalog = store(&[("B", 2), ("A", 1), ("C", 3)]);

        let entries = catalog.list().await;
        assert_eq!(
            entries,
            vec![
                CatalogEntry { product: "A".into(), available: 1 },
                CatalogEntry { product: "B".into(), available: 2 },
                CatalogEntry { product: "C".into(), available: 3 },
            ]
        );
    }
}
