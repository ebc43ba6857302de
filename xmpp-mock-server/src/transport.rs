//! Byte streams a connection reads stanzas from and writes stanzas to.

use crate::errors::transport_error::TransportError;

#[cfg(test)]
pub(crate) mod channel;
pub mod tcp;
pub mod websocket;

pub trait InboundTransport: Send {
    /// Next chunk of client bytes, `None` once the client is gone.
    fn receive(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;
}

pub trait OutboundTransport: Send {
    fn send(&mut self, frame: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn close(&mut self) -> impl Future<Output = ()> + Send;
}
