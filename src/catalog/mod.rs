//! Shared product catalog: a single actor owns every product and applies
//! stock actions one at a time.

mod actions;
pub mod entity;
mod seed;

pub use actions::*;
pub use seed::*;

use tokio::task::JoinHandle;

use crate::actor_framework::ResourceActor;
use crate::clients::CatalogClient;
use crate::domain::Product;

/// Spawns the catalog actor over `products` and returns its client handle.
pub fn start_catalog(
    buffer_size: usize,
    products: impl IntoIterator<Item = Product>,
) -> (CatalogClient, JoinHandle<()>) {
    let (actor, client) = ResourceActor::<Product>::new(buffer_size, products);
    let handle = tokio::spawn(actor.run());
    (CatalogClient::new(client), handle)
}
