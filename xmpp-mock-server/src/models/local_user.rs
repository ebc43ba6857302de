use super::friend::Presence;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LocalUser {
    pub identity: Arc<String>,
    pub name: Arc<String>,
    pub persona_id: Arc<String>,
    pub presence: Presence,
    pub status: Option<Arc<String>>,
}

impl LocalUser {
    pub fn new(identity: Arc<String>, name: Arc<String>, persona_id: Arc<String>) -> Self {
        LocalUser {
            identity,
            name,
            persona_id,
            presence: Presence::Offline,
            status: None,
        }
    }
}
