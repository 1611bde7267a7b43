//! Typed handles for talking to actors.

mod catalog_client;

pub use catalog_client::*;
