//! Integration tests for Sweet Treats.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sweet-treats-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Cart, pricing and checkout through a shopper session
//!
//! The helpers here stand in for the `PostgreSQL` order store so the flows
//! run without a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use sweet_treats_core::{
    Email, IdempotencyKey, Identity, NewOrder, OrderId, OrderStore, OrderStoreError, UserId,
};

/// In-memory order store that deduplicates on the idempotency key, the way
/// the unique index on `orders.idempotency_key` does.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<IdempotencyKey, (OrderId, NewOrder)>>,
    next_id: AtomicI32,
    failing: AtomicBool,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following insert fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of distinct orders stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no order has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored order with `id`, if any.
    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<NewOrder> {
        self.lock()
            .values()
            .find(|(stored, _)| *stored == id)
            .map(|(_, order)| order.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IdempotencyKey, (OrderId, NewOrder)>> {
        // A poisoned lock only means another test thread panicked.
        self.orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<OrderId, OrderStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OrderStoreError::msg("order store unavailable"));
        }

        let mut orders = self.lock();
        if let Some((id, _)) = orders.get(&order.idempotency_key) {
            tracing::debug!(order_id = %id, "Duplicate submission");
            return Ok(*id);
        }
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        orders.insert(order.idempotency_key, (id, order.clone()));
        drop(orders);
        Ok(id)
    }
}

/// A logged-in shopper.
///
/// # Errors
///
/// Returns an error if `email` is not a valid address.
pub fn shopper(id: i32, email: &str) -> Result<Identity, sweet_treats_core::EmailError> {
    Ok(Identity {
        id: UserId::new(id),
        email: Email::parse(email)?,
    })
}
