use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("A session is already registered for {0}")]
    DuplicateSession(String),
    #[error("Could not get sessions, lock poisoned")]
    LockPoisoned,
}
