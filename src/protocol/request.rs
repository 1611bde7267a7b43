use serde::Deserialize;
use serde_json::Value;

use super::ProtocolError;
use crate::domain::ProductId;

/// Which wire flavor a request line used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Text,
    Json,
}

impl Flavor {
    pub fn detect(line: &str) -> Self {
        if line.trim_start().starts_with('{') {
            Flavor::Json
        } else {
            Flavor::Text
        }
    }
}

/// A decoded request, independent of the flavor it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ViewProducts,
    ProductDetails(ProductId),
    AddToCart { id: ProductId, quantity: u32 },
    ViewCart,
    /// Check out the session cart.
    Checkout,
    /// Check out the supplied lines without touching the session cart.
    CheckoutItems(Vec<(ProductId, u32)>),
}

/// Decodes one request line. `line` must not be blank.
pub fn parse_command(line: &str, flavor: Flavor) -> Result<Command, ProtocolError> {
    match flavor {
        Flavor::Text => parse_text(line),
        Flavor::Json => parse_json(line),
    }
}

fn parse_text(line: &str) -> Result<Command, ProtocolError> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().unwrap_or_default();
    let args: Vec<&str> = tokens.collect();

    match verb {
        "VIEW_PRODUCTS" => expect_args(verb, &args, 0).map(|_| Command::ViewProducts),
        "VIEW_CART" => expect_args(verb, &args, 0).map(|_| Command::ViewCart),
        "CHECKOUT" => expect_args(verb, &args, 0).map(|_| Command::Checkout),
        "GET_PRODUCT_DETAILS" => {
            expect_args(verb, &args, 1)?;
            Ok(Command::ProductDetails(parse_id(args[0])?))
        }
        "ADD_TO_CART" => {
            expect_args(verb, &args, 2)?;
            let id = parse_id(args[0])?;
            let quantity = parse_quantity(args[1])?;
            Ok(Command::AddToCart { id, quantity })
        }
        other => Err(ProtocolError::UnknownCommand(other.to_string())),
    }
}

fn expect_args(verb: &str, args: &[&str], count: usize) -> Result<(), ProtocolError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(ProtocolError::malformed(format!(
            "Invalid request format for {}: expected {} argument(s), got {}",
            verb,
            count,
            args.len()
        )))
    }
}

fn parse_id(token: &str) -> Result<ProductId, ProtocolError> {
    token
        .parse::<i64>()
        .map_err(|_| ProtocolError::malformed(format!("Invalid product id: {}", token)))
        .and_then(product_id)
}

fn parse_quantity(token: &str) -> Result<u32, ProtocolError> {
    token
        .parse::<i64>()
        .map_err(|_| ProtocolError::malformed(format!("Invalid quantity: {}", token)))
        .and_then(quantity)
}

fn product_id(raw: i64) -> Result<ProductId, ProtocolError> {
    ProductId::try_from(raw).map_err(|_| ProtocolError::malformed(format!("Invalid product id: {}", raw)))
}

fn quantity(raw: i64) -> Result<u32, ProtocolError> {
    match u32::try_from(raw) {
        Ok(qty) if qty > 0 => Ok(qty),
        _ => Err(ProtocolError::malformed(format!(
            "Invalid quantity: {} (must be a positive integer)",
            raw
        ))),
    }
}

#[derive(Deserialize)]
struct IdArgs {
    id: i64,
}

#[derive(Deserialize)]
struct LineArgs {
    id: i64,
    quantity: i64,
}

#[derive(Deserialize)]
struct CheckoutArgs {
    #[serde(default)]
    cart: Option<Vec<LineArgs>>,
}

fn parse_json(line: &str) -> Result<Command, ProtocolError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| ProtocolError::malformed(format!("Invalid JSON: {}", e)))?;
    let action = value
        .get("action")
        .and_then(Value::as_str)
        .ok_or_else(|| ProtocolError::malformed("Missing \"action\" field"))?
        .to_string();

    match action.as_str() {
        "get_product_list" => Ok(Command::ViewProducts),
        "view_cart" => Ok(Command::ViewCart),
        "get_product_details" => {
            let args: IdArgs = arguments(&action, value)?;
            Ok(Command::ProductDetails(product_id(args.id)?))
        }
        "add_to_cart" => {
            let args: LineArgs = arguments(&action, value)?;
            Ok(Command::AddToCart {
                id: product_id(args.id)?,
                quantity: quantity(args.quantity)?,
            })
        }
        "checkout" => {
            let args: CheckoutArgs = arguments(&action, value)?;
            match args.cart {
                None => Ok(Command::Checkout),
                Some(lines) => lines
                    .into_iter()
                    .map(|line| Ok((product_id(line.id)?, quantity(line.quantity)?)))
                    .collect::<Result<Vec<_>, ProtocolError>>()
                    .map(Command::CheckoutItems),
            }
        }
        _ => Err(ProtocolError::UnknownCommand(action)),
    }
}

fn arguments<T: for<'de> Deserialize<'de>>(action: &str, value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value)
        .map_err(|e| ProtocolError::malformed(format!("Invalid request format for {}: {}", action, e)))
}
