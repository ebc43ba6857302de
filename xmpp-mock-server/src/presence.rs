//! Subscription, availability and game-state transitions for the friends of a roster.
//!
//! Transitions never fail for a violated precondition: they return
//! [`Outcome::Ignored`]. Only unknown presence values, incomplete game states and
//! "not playing" cases come back as [`Outcome::Rejected`], and those leave the
//! roster untouched.

pub mod availability;
pub mod chat;
pub mod game;
pub mod outcome;
pub mod subscription;
