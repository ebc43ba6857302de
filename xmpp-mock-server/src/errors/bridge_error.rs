use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("No session registered for {0}")]
    UnhandledTarget(String),
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Not a valid identity: {0}")]
    InvalidIdentity(String),
    #[error("Session went away before answering")]
    SessionGone,
}
