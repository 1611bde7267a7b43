use thiserror::Error;

use crate::domain::ProductId;
use crate::error::{CartError, CatalogError, CheckoutError};

/// Errors reported back to the client as an error line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    #[error("{0}")]
    MalformedRequest(String),
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Product ID {0} not found.")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for {0}.")]
    InsufficientStock(String),
    #[error("Product ID {0} is no longer available.")]
    ProductVanished(ProductId),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProtocolError {
    /// Stable name of the error kind as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::MalformedRequest(_) => "MalformedRequest",
            ProtocolError::UnknownCommand(_) => "UnknownCommand",
            ProtocolError::ProductNotFound(_) => "ProductNotFound",
            ProtocolError::InsufficientStock(_) => "InsufficientStock",
            ProtocolError::ProductVanished(_) => "ProductVanished",
            ProtocolError::Internal(_) => "Internal",
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ProtocolError::MalformedRequest(msg.into())
    }
}

impl From<CatalogError> for ProtocolError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ProtocolError::ProductNotFound(id),
            other => ProtocolError::Internal(other.to_string()),
        }
    }
}

impl From<CartError> for ProtocolError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity(_) | CartError::QuantityOverflow(_) => {
                ProtocolError::MalformedRequest(err.to_string())
            }
            CartError::ProductVanished(id) => ProtocolError::ProductVanished(id),
            CartError::Catalog(e) => e.into(),
        }
    }
}

impl From<CheckoutError> for ProtocolError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::ProductNotFound(id) => ProtocolError::ProductNotFound(id),
            CheckoutError::InsufficientStock { name, .. } => ProtocolError::InsufficientStock(name),
            CheckoutError::Catalog(e) => e.into(),
        }
    }
}
