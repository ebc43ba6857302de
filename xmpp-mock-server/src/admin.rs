//! Side channel a test driver uses to act as the local user's friends.

pub mod bridge;
pub mod command;
pub mod fixtures;
pub mod generators;
pub mod scheduler;
