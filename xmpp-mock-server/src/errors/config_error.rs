use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{variable} is not a valid socket address: {value}")]
    InvalidAddress { variable: &'static str, value: String },
    #[error("CORS_ORIGIN is not a valid header value: {0}")]
    InvalidOrigin(String),
}
