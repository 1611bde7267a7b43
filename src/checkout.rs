//! Checkout engine: turns a cart into stock reservations, all or nothing.

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::CatalogClient;
use crate::domain::{Cart, ProductId};
use crate::error::CheckoutError;

/// Outcome reported to the client after a checkout attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutResult {
    pub success: bool,
    pub message: String,
}

impl CheckoutResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            message: "Checkout successful.".to_string(),
        }
    }

    pub fn failed(err: &CheckoutError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
        }
    }
}

impl From<Result<(), CheckoutError>> for CheckoutResult {
    fn from(result: Result<(), CheckoutError>) -> Self {
        match result {
            Ok(()) => CheckoutResult::succeeded(),
            Err(e) => CheckoutResult::failed(&e),
        }
    }
}

/// Reservations taken so far within one call, in the order they were taken.
type Reserved = Vec<(ProductId, u32)>;

/// Applies carts to the shared catalog.
///
/// **Pattern:** like an orchestrating root actor, the engine owns no stock
/// itself; it sequences single-product actions on the catalog and undoes
/// its own earlier steps when a later one fails.
#[derive(Clone)]
pub struct CheckoutEngine {
    catalog: CatalogClient,
}

impl CheckoutEngine {
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Reserves every cart entry in ascending product id order.
    ///
    /// On any failure all reservations made by this call are released, in
    /// reverse order, before the error is returned. The cart is not touched;
    /// clearing it after success is the caller's job.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn checkout(&self, cart: &Cart) -> Result<(), CheckoutError> {
        info!("Processing checkout request");

        let mut reserved: Reserved = Vec::with_capacity(cart.len());
        for (id, quantity) in cart.entries() {
            if let Err(e) = self.reserve_line(id, quantity).await {
                error!(product_id = id, error = %e, "Checkout aborted");
                self.rollback(&reserved).await;
                return Err(e);
            }
            reserved.push((id, quantity));
        }

        info!(reserved_lines = reserved.len(), "Checkout completed");
        Ok(())
    }

    /// Looks a product up and reserves `quantity` of it.
    #[instrument(skip(self))]
    pub async fn reserve_line(&self, id: ProductId, quantity: u32) -> Result<(), CheckoutError> {
        let product = self
            .catalog
            .get(id)
            .await?
            .ok_or(CheckoutError::ProductNotFound(id))?;

        if self.catalog.try_reserve(id, quantity).await? {
            debug!(product_name = %product.name, "Line reserved");
            Ok(())
        } else {
            Err(CheckoutError::InsufficientStock {
                id,
                name: product.name,
                requested: quantity,
            })
        }
    }

    /// Hands back everything a cart holds, used when held stock is abandoned.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn release_cart(&self, cart: &Cart) {
        let held: Reserved = cart.entries().collect();
        self.rollback(&held).await;
    }

    async fn rollback(&self, reserved: &[(ProductId, u32)]) {
        if reserved.is_empty() {
            return;
        }
        warn!(lines = reserved.len(), "Rolling back reservations");
        for (id, quantity) in reserved.iter().rev() {
            if let Err(e) = self.catalog.release(*id, *quantity).await {
                error!(product_id = *id, quantity = *quantity, error = %e, "Failed to release reservation");
            }
        }
    }
}
