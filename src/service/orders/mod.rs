//! Order repository: read-only lookup of order records by identifier.

pub mod json;

use std::{ops::Deref, sync::Arc};

use crate::base::types::{Order, OrderError};

// Traits.

/// Generic order repository trait that repositories must implement.
///
/// Lookups are side-effect free: the same identifier always resolves to the
/// same record (or `NotFound`) for a given snapshot.
pub trait GenericOrderRepository: Send + Sync + 'static {
    /// Look up an order by exact, case-sensitive identifier.
    fn lookup(&self, order_id: &str) -> Result<Order, OrderError>;
}

// Structs.

/// Order repository handle for the application.
///
/// This is trivially cloneable and shares one immutable table across tickets.
#[derive(Clone)]
pub struct OrderRepository {
    inner: Arc<dyn GenericOrderRepository>,
}

impl Deref for OrderRepository {
    type Target = dyn GenericOrderRepository;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl OrderRepository {
    pub fn new(inner: Arc<dyn GenericOrderRepository>) -> Self {
        Self { inner }
    }
}
