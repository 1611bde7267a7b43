use crate::actor_framework::Entity;
use crate::domain::{Product, ProductId};
use super::actions::{CatalogAction, CatalogActionResult};

impl Entity for Product {
    type Id = ProductId;
    type Action = CatalogAction;
    type ActionResult = CatalogActionResult;

    fn id(&self) -> ProductId { self.id }

    /// Handles stock actions.
    ///
    /// # Actions
    /// - `TryReserve(amount)`: takes `amount` from stock only if it is all there
    /// - `Release(amount)`: returns `amount` to stock
    ///
    /// # Errors
    /// Returns an error if a release would overflow the stock counter.
    fn handle_action(&mut self, action: CatalogAction) -> Result<CatalogActionResult, String> {
        match action {
            CatalogAction::TryReserve(amount) => {
                let reserved = self.stock >= amount;
                if reserved {
                    self.stock -= amount;
                }
                Ok(CatalogActionResult::TryReserve { reserved, stock: self.stock })
            }
            CatalogAction::Release(amount) => {
                self.stock = self.stock.checked_add(amount).ok_or_else(|| {
                    format!("Stock overflow: {} available, {} released", self.stock, amount)
                })?;
                Ok(CatalogActionResult::Release { stock: self.stock })
            }
        }
    }
}
