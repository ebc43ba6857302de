use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Could not use socket: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not use WebSocket: {0}")]
    WebSocket(#[from] axum::Error),
    #[error("Transport is closed")]
    Closed,
}
