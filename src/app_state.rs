//! Application state for the demo host.
//!
//! The demo server owns an in-memory order book and a handle to the
//! gatherer its `/metrics` route renders. Both sit behind `Arc`, so the
//! state is cheap to clone into each handler.

use crate::domain::GathererPtr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An order held by the demo service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: u64,
    pub item: String,
    pub quantity: u32,
}

/// Shared application state passed to all demo handlers.
///
/// # Fields
///
/// - `gatherer`: snapshot source rendered by the `/metrics` route
/// - `orders`: in-memory order book keyed by id
/// - `next_id`: id allocator for new orders
#[derive(Clone)]
pub(crate) struct AppState {
    gatherer: GathererPtr,
    orders: Arc<RwLock<BTreeMap<u64, Order>>>,
    next_id: Arc<AtomicU64>,
}

impl AppState {
    // ---

    pub fn new(gatherer: GathererPtr) -> Self {
        // ---
        AppState {
            gatherer,
            orders: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get a reference to the gatherer.
    pub(crate) fn gatherer(&self) -> &GathererPtr {
        &self.gatherer
    }

    /// All orders, in id order.
    pub(crate) async fn list_orders(&self) -> Vec<Order> {
        self.orders.read().await.values().cloned().collect()
    }

    /// Look up one order.
    pub(crate) async fn get_order(&self, id: u64) -> Option<Order> {
        self.orders.read().await.get(&id).cloned()
    }

    /// Store a new order and return it with its assigned id.
    pub(crate) async fn add_order(&self, item: String, quantity: u32) -> Order {
        // ---
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let order = Order { id, item, quantity };
        self.orders.write().await.insert(id, order.clone());
        order
    }
}
