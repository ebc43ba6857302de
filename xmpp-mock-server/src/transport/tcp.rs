use super::{InboundTransport, OutboundTransport};
use crate::errors::transport_error::TransportError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

pub struct TcpInbound {
    rd: OwnedReadHalf,
    buf: Box<[u8; 4096]>,
}

pub struct TcpOutbound {
    wr: OwnedWriteHalf,
}

pub fn split(socket: TcpStream) -> (TcpInbound, TcpOutbound) {
    let (rd, wr) = socket.into_split();
    (
        TcpInbound {
            rd,
            buf: Box::new([0; 4096]),
        },
        TcpOutbound { wr },
    )
}

impl InboundTransport for TcpInbound {
    async fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let received = self.rd.read(&mut self.buf[..]).await?;
        if received == 0 {
            return Ok(None);
        }

        Ok(Some(self.buf[..received].to_vec()))
    }
}

impl OutboundTransport for TcpOutbound {
    async fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        self.wr.write_all(frame.as_bytes()).await?;
        Ok(())
    }

    async fn close(&mut self) {
        let _ = self.wr.shutdown().await;
    }
}
