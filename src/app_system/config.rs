use clap::{Parser, ValueEnum};

/// When stock leaves the catalog for a session cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReservationMode {
    /// Stock is only taken when the cart is checked out.
    #[default]
    AtCheckout,
    /// Stock is taken as soon as a line is added, and handed back if the
    /// connection closes before checkout.
    OnAdd,
}

/// Server configuration, from command-line flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "shop-server")]
#[command(about = "Product catalog and shopping cart server over plain TCP")]
pub struct ServerConfig {
    /// Interface to listen on
    #[arg(long, env = "SHOP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to listen on
    #[arg(short, long, env = "SHOP_PORT", default_value_t = 5000)]
    pub port: u16,

    /// When add-to-cart takes stock from the catalog
    #[arg(long, env = "SHOP_RESERVATION_MODE", value_enum, default_value_t = ReservationMode::AtCheckout)]
    pub reservation_mode: ReservationMode,

    /// Longest accepted request line, in bytes
    #[arg(long, env = "SHOP_MAX_LINE_LENGTH", default_value_t = 8192)]
    pub max_line_length: usize,

    /// Capacity of the catalog actor's request queue
    #[arg(long, env = "SHOP_CATALOG_BUFFER", default_value_t = 100)]
    pub catalog_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            reservation_mode: ReservationMode::AtCheckout,
            max_line_length: 8192,
            catalog_buffer: 100,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
