pub mod friend;
pub mod identity;
pub mod local_user;
pub mod profile;
pub mod roster;
