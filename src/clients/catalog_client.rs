use tracing::{debug, info, instrument, warn};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::catalog::{CatalogAction, CatalogActionResult};
use crate::domain::{Product, ProductId};
use crate::error::CatalogError;

/// Client for interacting with the catalog actor.
///
/// Cheap to clone; every connection holds its own copy.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Product>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    /// Snapshot of every product, ascending by id.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        debug!("Sending request");
        Ok(self.inner.get(id).await?)
    }

    /// Takes `quantity` from stock in one step. `Ok(false)` means not enough
    /// stock was available and nothing changed.
    #[instrument(skip(self))]
    pub async fn try_reserve(&self, id: ProductId, quantity: u32) -> Result<bool, CatalogError> {
        debug!("Sending request");
        match self.perform(id, CatalogAction::TryReserve(quantity)).await? {
            CatalogActionResult::TryReserve { reserved: true, stock } => {
                info!(remaining_stock = stock, "Stock reserved");
                Ok(true)
            }
            CatalogActionResult::TryReserve { reserved: false, stock } => {
                warn!(available = stock, requested = quantity, "Insufficient stock");
                Ok(false)
            }
            other => Err(CatalogError::Rejected(format!("Unexpected result: {:?}", other))),
        }
    }

    /// Returns `quantity` to stock. No check is made that it was reserved.
    #[instrument(skip(self))]
    pub async fn release(&self, id: ProductId, quantity: u32) -> Result<(), CatalogError> {
        debug!("Sending request");
        match self.perform(id, CatalogAction::Release(quantity)).await? {
            CatalogActionResult::Release { stock } => {
                info!(stock, "Stock released");
                Ok(())
            }
            other => Err(CatalogError::Rejected(format!("Unexpected result: {:?}", other))),
        }
    }

    async fn perform(&self, id: ProductId, action: CatalogAction) -> Result<CatalogActionResult, CatalogError> {
        let is_release = matches!(action, CatalogAction::Release(_));
        self.inner.perform_action(id, action).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => CatalogError::NotFound(id),
            FrameworkError::ActionFailed(_) if is_release => CatalogError::StockOverflow(id),
            other => other.into(),
        })
    }
}
