use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::ProductId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product ID {0} not found")]
    NotFound(ProductId),
    #[error("Stock overflow on product ID {0}")]
    StockOverflow(ProductId),
    #[error("Catalog rejected the action: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::ActionFailed(msg) => CatalogError::Rejected(msg),
            other => CatalogError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Quantity overflow for product ID {0}")]
    QuantityOverflow(ProductId),
    #[error("Product ID {0} is in the cart but no longer in the catalog")]
    ProductVanished(ProductId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    #[error("Product ID {0} not found.")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for {name}.")]
    InsufficientStock {
        id: ProductId,
        name: String,
        requested: u32,
    },
    #[error("Checkout failed due to an error: {0}")]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind TCP listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("Client IO error: {0}")]
    ClientIo(#[from] std::io::Error),
    #[error("Catalog task failed: {0}")]
    CatalogTask(String),
}
