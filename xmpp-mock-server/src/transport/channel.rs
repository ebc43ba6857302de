use super::{InboundTransport, OutboundTransport};
use crate::errors::transport_error::TransportError;
use tokio::sync::mpsc;

/// In-memory transport pair for driving a connection from a test.
pub(crate) struct ChannelInbound {
    pub(crate) rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

pub(crate) struct ChannelOutbound {
    pub(crate) tx: mpsc::UnboundedSender<String>,
}

impl InboundTransport for ChannelInbound {
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.rx.recv().await)
    }
}

impl OutboundTransport for ChannelOutbound {
    async fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        self.tx
            .send(frame.to_string())
            .or(Err(TransportError::Closed))
    }

    async fn close(&mut self) {}
}
