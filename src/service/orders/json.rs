//! JSON-file backed order repository.
//!
//! The dataset is a JSON array of order objects, each with an `order_id`.  It is
//! read once and held as an immutable in-memory table.

use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::base::types::{Order, OrderError, Res};

use super::{GenericOrderRepository, OrderRepository};

// Extra methods on `OrderRepository` applied by the json implementation.

impl OrderRepository {
    /// Load a repository from a JSON dataset on disk.
    pub fn json(path: &Path) -> Res<Self> {
        let repository = JsonOrderRepository::load(path)?;
        Ok(Self { inner: Arc::new(repository) })
    }

    /// Build a repository from records already in memory.
    pub fn from_orders(orders: Vec<Order>) -> Self {
        Self {
            inner: Arc::new(JsonOrderRepository::from_orders(orders)),
        }
    }
}

/// In-memory table of orders keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct JsonOrderRepository {
    orders: HashMap<String, Order>,
}

impl JsonOrderRepository {
    /// Read and index the dataset at `path`.
    #[instrument(name = "JsonOrderRepository::load", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Res<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read order dataset `{}`.", path.display()))?;
        let orders: Vec<Order> = serde_json::from_str(&raw).with_context(|| format!("Failed to parse order dataset `{}`.", path.display()))?;

        let repository = Self::from_orders(orders);
        info!("Loaded {} orders.", repository.len());

        Ok(repository)
    }

    /// Index a list of orders.  When an identifier repeats, the first record wins.
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let mut table = HashMap::with_capacity(orders.len());

        for order in orders {
            if table.contains_key(&order.order_id) {
                warn!("Duplicate order `{}` ignored.", order.order_id);
                continue;
            }
            table.insert(order.order_id.clone(), order);
        }

        Self { orders: table }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl GenericOrderRepository for JsonOrderRepository {
    fn lookup(&self, order_id: &str) -> Result<Order, OrderError> {
        self.orders.get(order_id).cloned().ok_or_else(|| OrderError::NotFound { order_id: order_id.to_string() })
    }
}
