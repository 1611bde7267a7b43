//! TCP front end: a listener that spawns one handler task per connection.

mod connection;
mod listener;

pub use connection::*;
pub use listener::*;
