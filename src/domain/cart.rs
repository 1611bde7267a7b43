use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::clients::CatalogClient;
use crate::domain::ProductId;
use crate::error::CartError;

/// A cart line joined with its catalog display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Pending order of a single connection.
///
/// Entries are kept sorted by product id, which is also the order the
/// checkout engine reserves them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    entries: BTreeMap<ProductId, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of a product, merging with an existing entry.
    pub fn add(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        let current = self.entries.get(&id).copied().unwrap_or(0);
        let updated = current
            .checked_add(quantity)
            .ok_or(CartError::QuantityOverflow(id))?;
        self.entries.insert(id, updated);
        Ok(())
    }

    pub fn quantity_of(&self, id: ProductId) -> Option<u32> {
        self.entries.get(&id).copied()
    }

    /// Entries in ascending product id order.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = (ProductId, u32)> + '_ {
        self.entries.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Joins every entry with the catalog for display.
    #[instrument(skip(self, catalog), fields(lines = self.entries.len()))]
    pub async fn view(&self, catalog: &CatalogClient) -> Result<Vec<CartLine>, CartError> {
        let mut lines = Vec::with_capacity(self.entries.len());
        for (id, quantity) in self.entries() {
            let product = match catalog.get(id).await? {
                Some(product) => product,
                None => {
                    warn!(product_id = id, "Cart references a product missing from the catalog");
                    return Err(CartError::ProductVanished(id));
                }
            };
            lines.push(CartLine {
                id,
                name: product.name,
                quantity,
                price: product.price,
            });
        }
        debug!("Cart joined with catalog");
        Ok(lines)
    }
}
