use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Could not read friends fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse friends fixture: {0}")]
    Parse(#[from] serde_json::Error),
}
