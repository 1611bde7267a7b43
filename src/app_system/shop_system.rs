use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::app_system::ServerConfig;
use crate::catalog::{seed_products, start_catalog};
use crate::clients::CatalogClient;
use crate::dispatcher::Dispatcher;
use crate::domain::Product;
use crate::error::ServerError;
use crate::server::Listener;

/// How long shutdown waits for the catalog actor to drain.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Owns the catalog actor and wires it into the request path.
///
/// **Startup Order:**
/// 1. Start the catalog actor with the product set
/// 2. Build the dispatcher around a clone of the catalog client
/// 3. Bind the listener, which clones the dispatcher into every connection
pub struct ShopSystem {
    pub catalog: CatalogClient,
    pub dispatcher: Dispatcher,
    handle: JoinHandle<()>,
}

impl ShopSystem {
    /// Starts the system with the standard seed catalog.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_products(config, seed_products())
    }

    #[instrument(name = "shop_system", skip(config, products))]
    pub fn with_products(config: &ServerConfig, products: Vec<Product>) -> Self {
        info!(product_count = products.len(), "Starting shop system");

        let (catalog, handle) = start_catalog(config.catalog_buffer, products);
        let dispatcher = Dispatcher::new(catalog.clone(), config.reservation_mode);

        info!(mode = ?config.reservation_mode, "Shop system started");
        Self {
            catalog,
            dispatcher,
            handle,
        }
    }

    pub async fn bind(&self, config: &ServerConfig) -> Result<Listener, ServerError> {
        Listener::bind(&config.bind_addr(), self.dispatcher.clone(), config.max_line_length).await
    }

    /// Drops this system's catalog handles and waits for the actor to stop.
    ///
    /// Connections still open keep their own handles; if they outlive the
    /// grace period the actor is aborted.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), ServerError> {
        info!("Shutting down shop system");
        let Self { catalog, dispatcher, mut handle } = self;
        drop(dispatcher);
        drop(catalog);

        match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
            Ok(Ok(())) => {
                info!("Shop system shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => {
                error!(error = ?e, "Catalog task failed");
                Err(ServerError::CatalogTask(e.to_string()))
            }
            Err(_) => {
                warn!("Catalog still in use by open connections, aborting");
                handle.abort();
                Ok(())
            }
        }
    }
}
