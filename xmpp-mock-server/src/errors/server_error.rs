use super::{
    registry_error::RegistryError, transport_error::TransportError, upstream_error::UpstreamError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Could not bind {0}: {1}")]
    Bind(std::net::SocketAddr, std::io::Error),
    #[error("Client disconnected")]
    Disconnected,
    #[error("Could not tell who is authenticating")]
    Unidentified,
    #[error("Client closed the stream")]
    StreamClosed,
    #[error("Could not register session: {0}")]
    Registry(#[from] RegistryError),
    #[error("Could not set up session: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("Transport failed: {0}")]
    Transport(#[from] TransportError),
}
