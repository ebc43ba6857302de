use crate::models::local_user::LocalUser;
use crate::models::roster::Roster;
use pending::PendingRequests;
use std::sync::Arc;

pub mod pending;

/// Everything one authenticated connection owns.
#[derive(Debug)]
pub struct Session {
    pub session_id: Arc<String>,
    pub local_user: LocalUser,
    pub roster: Roster,
    pub block_list: Vec<String>,
    pub pending: PendingRequests,
    pub resource: Option<String>,
    /// Set once the initial presence of the roster has been sent.
    pub announced: bool,
}

impl Session {
    pub fn new(local_user: LocalUser, roster: Roster) -> Self {
        Session {
            session_id: Arc::new(guid_create::GUID::rand().to_string().to_lowercase()),
            local_user,
            roster,
            block_list: Vec::new(),
            pending: PendingRequests::new(),
            resource: None,
            announced: false,
        }
    }

    pub fn identity(&self) -> &Arc<String> {
        &self.local_user.identity
    }

    /// Full address once a resource is bound, the bare identity before that.
    pub fn jid(&self) -> String {
        match &self.resource {
            Some(resource) => format!("{}/{resource}", self.local_user.identity),
            None => self.local_user.identity.to_string(),
        }
    }
}
