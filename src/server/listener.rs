use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{error, info, info_span, warn, Instrument};

use super::ConnectionHandler;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;

/// Pause after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts connections and runs a [`ConnectionHandler`] task for each.
///
/// There is no admission control: every accepted socket gets its own task.
pub struct Listener {
    listener: TcpListener,
    dispatcher: Dispatcher,
    max_line_length: usize,
}

impl Listener {
    pub async fn bind(addr: &str, dispatcher: Dispatcher, max_line_length: usize) -> Result<Self, ServerError> {
        info!(%addr, "Binding TCP listener");
        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self {
            listener,
            dispatcher,
            max_line_length,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept loop. Runs until the task is dropped; a failing connection or
    /// a failed accept never stops it.
    pub async fn run(self) {
        info!(mode = ?self.dispatcher.mode(), "Listener accepting connections");
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    info!(%peer, "Client connected");
                    let handler = ConnectionHandler::new(stream, peer, self.dispatcher.clone(), self.max_line_length);
                    tokio::spawn(
                        async move {
                            if let Err(e) = handler.run().await {
                                warn!(error = %e, "Connection ended with error");
                            }
                            info!("Client disconnected");
                        }
                        .instrument(info_span!("connection", %peer)),
                    );
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept TCP connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}
