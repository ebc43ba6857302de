use crate::errors::config_error::ConfigError;
use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_XMPP_ADDR: &str = "0.0.0.0:5222";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DOMAIN: &str = "mock.local";

#[derive(Debug, Clone)]
pub struct Config {
    pub xmpp_addr: SocketAddr,
    pub http_addr: SocketAddr,
    pub domain: String,
    pub friends_fixture: Option<PathBuf>,
    /// Any origin when unset.
    pub cors_origin: Option<HeaderValue>,
}

fn address(variable: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let value = env::var(variable).unwrap_or_else(|_| default.to_string());
    value
        .parse()
        .or(Err(ConfigError::InvalidAddress { variable, value }))
}

impl Config {
    /// Reads the environment; call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Config, ConfigError> {
        let cors_origin = match env::var("CORS_ORIGIN") {
            Ok(origin) => Some(
                origin
                    .parse::<HeaderValue>()
                    .or(Err(ConfigError::InvalidOrigin(origin)))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            xmpp_addr: address("XMPP_LISTEN_ADDR", DEFAULT_XMPP_ADDR)?,
            http_addr: address("HTTP_LISTEN_ADDR", DEFAULT_HTTP_ADDR)?,
            domain: env::var("XMPP_DOMAIN").unwrap_or_else(|_| DEFAULT_DOMAIN.to_string()),
            friends_fixture: env::var("FRIENDS_FIXTURE").ok().map(PathBuf::from),
            cors_origin,
        })
    }

    /// Loopback listeners on ephemeral ports.
    pub fn local(domain: &str) -> Config {
        Config {
            xmpp_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            http_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            domain: domain.to_string(),
            friends_fixture: None,
            cors_origin: None,
        }
    }
}
