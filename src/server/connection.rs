use std::io;
use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Framed};
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;
use crate::domain::Cart;
use crate::error::ServerError;
use crate::protocol::{parse_command, Flavor, ProtocolError, Response};

/// One client session: read a line, dispatch it, write the answer, repeat.
///
/// The handler owns the session cart. When the loop ends for any reason the
/// cart is handed to [`Dispatcher::close_session`] and dropped.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, AnyDelimiterCodec>,
    peer: SocketAddr,
    dispatcher: Dispatcher,
    cart: Cart,
}

impl ConnectionHandler {
    pub fn new(stream: TcpStream, peer: SocketAddr, dispatcher: Dispatcher, max_line_length: usize) -> Self {
        Self {
            framed: Framed::new(
                stream,
                AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_line_length),
            ),
            peer,
            dispatcher,
            cart: Cart::new(),
        }
    }

    pub async fn run(mut self) -> Result<(), ServerError> {
        let result = self.serve().await;
        self.dispatcher.close_session(std::mem::take(&mut self.cart)).await;
        result
    }

    async fn serve(&mut self) -> Result<(), ServerError> {
        while let Some(frame) = self.framed.next().await {
            let bytes = match frame {
                Ok(bytes) => bytes,
                Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => {
                    // The framed stream is finished after a decode error.
                    warn!(peer = %self.peer, "Request line too long, closing session");
                    let err = ProtocolError::malformed("Request line too long");
                    return self.respond(Response::Error(err), Flavor::Text).await;
                }
                Err(AnyDelimiterCodecError::Io(e)) => return Err(ServerError::ClientIo(e)),
            };

            let line = match std::str::from_utf8(&bytes) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!(peer = %self.peer, error = %e, "Request is not valid UTF-8");
                    let err = ProtocolError::malformed("Request is not valid UTF-8");
                    self.respond(Response::Error(err), Flavor::Text).await?;
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            debug!(peer = %self.peer, request = %line, "Received request");

            let flavor = Flavor::detect(line);
            let response = match parse_command(line, flavor) {
                Ok(command) => self.dispatcher.dispatch(&mut self.cart, command).await,
                Err(err) => {
                    warn!(peer = %self.peer, error = %err, "Rejected request");
                    Response::Error(err)
                }
            };
            self.respond(response, flavor).await?;
        }

        info!(peer = %self.peer, "Peer closed connection");
        Ok(())
    }

    async fn respond(&mut self, response: Response, flavor: Flavor) -> Result<(), ServerError> {
        let line = response.encode(flavor);
        self.framed.send(line).await.map_err(|e| match e {
            AnyDelimiterCodecError::Io(e) => ServerError::ClientIo(e),
            other => ServerError::ClientIo(io::Error::new(io::ErrorKind::InvalidData, other.to_string())),
        })
    }
}
