use serde_json::json;
use tracing::error;

use super::{Flavor, ProtocolError};
use crate::checkout::CheckoutResult;
use crate::domain::{CartLine, Product};

/// One response line, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Products(Vec<Product>),
    Product(Product),
    Cart(Vec<CartLine>),
    Added { quantity: u32, name: String },
    Checkout(CheckoutResult),
    Error(ProtocolError),
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::Error(err)
    }
}

impl Response {
    /// Encodes the response as a single line, without the trailing newline.
    pub fn encode(&self, flavor: Flavor) -> String {
        match self.try_encode(flavor) {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                encode_error(&ProtocolError::Internal(e.to_string()), flavor)
            }
        }
    }

    fn try_encode(&self, flavor: Flavor) -> Result<String, serde_json::Error> {
        match self {
            Response::Products(products) => serde_json::to_string(products),
            Response::Product(product) => serde_json::to_string(product),
            Response::Cart(lines) => serde_json::to_string(lines),
            Response::Checkout(result) => serde_json::to_string(result),
            Response::Added { quantity, name } => {
                let message = format!("Added {} of {} to cart.", quantity, name);
                Ok(match flavor {
                    Flavor::Text => message,
                    Flavor::Json => json!({ "success": true, "message": message }).to_string(),
                })
            }
            Response::Error(err) => Ok(encode_error(err, flavor)),
        }
    }
}

fn encode_error(err: &ProtocolError, flavor: Flavor) -> String {
    match flavor {
        Flavor::Text => format!("ERR {}: {}", err.kind(), err),
        Flavor::Json => json!({ "error": err.kind(), "message": err.to_string() }).to_string(),
    }
}
