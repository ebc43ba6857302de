use super::{InboundTransport, OutboundTransport};
use crate::errors::transport_error::TransportError;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

pub struct WebSocketInbound {
    stream: SplitStream<WebSocket>,
}

pub struct WebSocketOutbound {
    sink: SplitSink<WebSocket, Message>,
}

pub fn split(socket: WebSocket) -> (WebSocketInbound, WebSocketOutbound) {
    let (sink, stream) = socket.split();
    (WebSocketInbound { stream }, WebSocketOutbound { sink })
}

impl InboundTransport for WebSocketInbound {
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(None);
            };

            match message? {
                Message::Text(text) => return Ok(Some(text.as_str().as_bytes().to_vec())),
                Message::Binary(bytes) => return Ok(Some(bytes.to_vec())),
                Message::Close(_) => return Ok(None),
                Message::Ping(_) | Message::Pong(_) => (),
            }
        }
    }
}

impl OutboundTransport for WebSocketOutbound {
    async fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        self.sink.send(Message::Text(frame.into())).await?;
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}
