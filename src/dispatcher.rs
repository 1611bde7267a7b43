//! Routes decoded commands to the catalog, the session cart and the
//! checkout engine.

use tracing::{debug, info, instrument, warn};

use crate::app_system::ReservationMode;
use crate::checkout::{CheckoutEngine, CheckoutResult};
use crate::clients::CatalogClient;
use crate::domain::{Cart, Product, ProductId};
use crate::error::CheckoutError;
use crate::protocol::{Command, ProtocolError, Response};

/// Stateless request router shared by every connection.
///
/// The only per-session state is the cart, which the connection owns and
/// lends to [`Dispatcher::dispatch`] for the duration of one request.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: CatalogClient,
    engine: CheckoutEngine,
    mode: ReservationMode,
}

impl Dispatcher {
    pub fn new(catalog: CatalogClient, mode: ReservationMode) -> Self {
        let engine = CheckoutEngine::new(catalog.clone());
        Self { catalog, engine, mode }
    }

    pub fn mode(&self) -> ReservationMode {
        self.mode
    }

    /// Handles one command. Failures become [`Response::Error`] and never
    /// leave the cart or the catalog partly changed.
    pub async fn dispatch(&self, cart: &mut Cart, command: Command) -> Response {
        let result = match command {
            Command::ViewProducts => self.view_products().await,
            Command::ProductDetails(id) => self.product_details(id).await,
            Command::AddToCart { id, quantity } => self.add_to_cart(cart, id, quantity).await,
            Command::ViewCart => self.view_cart(cart).await,
            Command::Checkout => Ok(self.checkout_session(cart).await),
            Command::CheckoutItems(lines) => self.checkout_items(lines).await,
        };
        result.unwrap_or_else(Response::Error)
    }

    /// Ends a session. In [`ReservationMode::OnAdd`] the cart's stock is
    /// still held by the catalog and goes back to it here.
    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    pub async fn close_session(&self, cart: Cart) {
        if self.mode == ReservationMode::OnAdd && !cart.is_empty() {
            info!("Releasing stock held by abandoned cart");
            self.engine.release_cart(&cart).await;
        }
    }

    #[instrument(skip(self))]
    async fn view_products(&self) -> Result<Response, ProtocolError> {
        let products = self.catalog.list().await?;
        debug!(product_count = products.len(), "Listed products");
        Ok(Response::Products(products))
    }

    #[instrument(skip(self))]
    async fn product_details(&self, id: ProductId) -> Result<Response, ProtocolError> {
        Ok(Response::Product(self.find(id).await?))
    }

    #[instrument(skip(self, cart))]
    async fn add_to_cart(&self, cart: &mut Cart, id: ProductId, quantity: u32) -> Result<Response, ProtocolError> {
        let product = self.find(id).await?;

        // Stage the change so a refused reservation leaves the cart as it was.
        let mut updated = cart.clone();
        updated.add(id, quantity)?;

        if self.mode == ReservationMode::OnAdd {
            self.engine.reserve_line(id, quantity).await?;
        }

        *cart = updated;
        info!(product_name = %product.name, in_cart = ?cart.quantity_of(id), "Added to cart");
        Ok(Response::Added { quantity, name: product.name })
    }

    #[instrument(skip(self, cart))]
    async fn view_cart(&self, cart: &Cart) -> Result<Response, ProtocolError> {
        Ok(Response::Cart(cart.view(&self.catalog).await?))
    }

    #[instrument(skip(self, cart), fields(lines = cart.len()))]
    async fn checkout_session(&self, cart: &mut Cart) -> Response {
        let result = match self.mode {
            ReservationMode::AtCheckout => self.engine.checkout(cart).await,
            // Every line was reserved when it was added.
            ReservationMode::OnAdd => Ok(()),
        };
        if result.is_ok() {
            cart.clear();
        }
        Response::Checkout(CheckoutResult::from(result))
    }

    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    async fn checkout_items(&self, lines: Vec<(ProductId, u32)>) -> Result<Response, ProtocolError> {
        let mut cart = Cart::new();
        for (id, quantity) in lines {
            cart.add(id, quantity)?;
        }
        let result = self.engine.checkout(&cart).await;
        if let Err(CheckoutError::Catalog(e)) = &result {
            warn!(error = %e, "Checkout of supplied cart hit a catalog error");
        }
        Ok(Response::Checkout(CheckoutResult::from(result)))
    }

    async fn find(&self, id: ProductId) -> Result<Product, ProtocolError> {
        self.catalog.get(id).await?.ok_or(ProtocolError::ProductNotFound(id))
    }
}
