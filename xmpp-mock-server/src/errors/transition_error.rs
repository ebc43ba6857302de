use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Unknown presence value: {0}")]
    UnknownPresence(String),
    #[error("Missing game state field: {0}")]
    MissingGameField(&'static str),
    #[error("{0} wasn't playing")]
    NotPlaying(String),
    #[error("{0} is not in the roster")]
    UnknownContact(String),
}
