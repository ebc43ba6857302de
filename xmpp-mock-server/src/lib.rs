//! A mock XMPP server for exercising a game client's friends features.
//!
//! Clients connect over TCP or WebSocket, sign in with a fixture roster and get
//! answered the way a real server would. The HTTP side channel lets a test
//! harness drive simulated friends and pre-seed canned responses.

use crate::context::ServerContext;
use crate::errors::server_error::ServerError;
use crate::transport::tcp;
use axum::http::HeaderValue;
use log::{debug, error, info};
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub mod admin;
pub mod config;
pub mod connection;
pub mod context;
pub mod directory;
pub mod errors;
pub mod http;
pub mod message;
pub mod models;
pub mod presence;
pub mod registry;
pub mod session;
pub mod transport;
pub mod xmpp;

pub use config::Config;

/// Both listeners bound, not yet accepting.
pub struct Server {
    xmpp_listener: TcpListener,
    http_listener: TcpListener,
    context: ServerContext,
    cors_origin: Option<HeaderValue>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Server, ServerError> {
        let xmpp_listener = TcpListener::bind(config.xmpp_addr)
            .await
            .map_err(|error| ServerError::Bind(config.xmpp_addr, error))?;

        let http_listener = TcpListener::bind(config.http_addr)
            .await
            .map_err(|error| ServerError::Bind(config.http_addr, error))?;

        Ok(Server {
            xmpp_listener,
            http_listener,
            context: ServerContext::new(&config),
            cors_origin: config.cors_origin,
        })
    }

    pub fn xmpp_addr(&self) -> io::Result<SocketAddr> {
        self.xmpp_listener.local_addr()
    }

    pub fn http_addr(&self) -> io::Result<SocketAddr> {
        self.http_listener.local_addr()
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// Accepts connections forever.
    pub async fn run(self) {
        tokio::spawn(http::listen(
            self.http_listener,
            self.context.clone(),
            self.cors_origin,
        ));

        if let Ok(address) = self.xmpp_listener.local_addr() {
            info!("XMPP server listening on {address}");
        }

        loop {
            let (socket, remote_addr) = match self.xmpp_listener.accept().await {
                Ok(connection) => connection,
                Err(error) => {
                    error!("Could not get socket from accepted XMPP connection: {error}");
                    continue;
                }
            };

            debug!("XMPP connection from {remote_addr}");
            let context = self.context.clone();

            tokio::spawn(async move {
                let (inbound, outbound) = tcp::split(socket);
                connection::serve(inbound, outbound, context).await;
            });
        }
    }
}
