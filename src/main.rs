//! # Shop Server
//!
//! A small ordering server: clients connect over plain TCP, browse a shared
//! product catalog, fill a per-connection cart and check it out. Checkout
//! takes stock for every line or for none of them.
//!
//! - **Catalog** - a single actor owns all products; stock actions are applied
//!   one at a time → [`catalog`], [`clients::CatalogClient`]
//! - **Cart** - owned by its connection, never shared → [`domain::Cart`]
//! - **Checkout engine** - reserves lines in id order, rolls back on failure
//!   → [`checkout::CheckoutEngine`]
//! - **Dispatcher** - one command in, one response out → [`dispatcher::Dispatcher`]
//! - **Connection handler / listener** - one task per client → [`server`]
//!
//! ```bash
//! shop_server --port 5000
//! RUST_LOG=debug shop_server --reservation-mode on-add
//! ```

mod actor_framework;
mod app_system;
mod catalog;
mod checkout;
mod clients;
mod dispatcher;
mod domain;
mod error;
mod protocol;
mod server;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;

use clap::Parser;
use tracing::{error, info};

use crate::app_system::{setup_tracing, ServerConfig, ShopSystem};
use crate::error::ServerError;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::parse();
    setup_tracing();

    info!(?config, "Starting shop server");

    let system = ShopSystem::new(&config);
    let listener = system.bind(&config).await?;
    info!(addr = %listener.local_addr()?, "Server is running and waiting for connections");

    tokio::select! {
        _ = listener.run() => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received Ctrl-C"),
                Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        }
    }

    system.shutdown().await?;
    info!("Server stopped");
    Ok(())
}
