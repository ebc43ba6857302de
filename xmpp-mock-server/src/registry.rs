use crate::admin::command::{BridgeReply, FriendCommand};
use crate::errors::bridge_error::BridgeError;
use crate::errors::registry_error::RegistryError;
use crate::message::SessionMessage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// Way into a session's task.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub session_id: Arc<String>,
    session_tx: mpsc::Sender<SessionMessage>,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.session_id == other.session_id
    }
}

impl SessionHandle {
    pub fn new(session_id: Arc<String>, session_tx: mpsc::Sender<SessionMessage>) -> Self {
        SessionHandle {
            session_id,
            session_tx,
        }
    }

    /// Runs a friend command inside the session and waits for its answer.
    pub async fn bridge(&self, command: FriendCommand) -> Result<BridgeReply, BridgeError> {
        let (reply, answer) = oneshot::channel();
        self.submit(SessionMessage::Bridge { command, reply }).await?;
        answer.await.or(Err(BridgeError::SessionGone))
    }

    pub async fn submit(&self, message: SessionMessage) -> Result<(), BridgeError> {
        self.session_tx
            .send(message)
            .await
            .or(Err(BridgeError::SessionGone))
    }
}

/// Live sessions by local user identity, at most one each.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    pub fn register(&self, identity: &str, handle: SessionHandle) -> Result<(), RegistryError> {
        let mut sessions = self
            .sessions
            .lock()
            .or(Err(RegistryError::LockPoisoned))?;

        if sessions.contains_key(identity) {
            return Err(RegistryError::DuplicateSession(identity.to_string()));
        }

        sessions.insert(identity.to_string(), handle);
        Ok(())
    }

    pub fn lookup(&self, identity: &str) -> Result<Option<SessionHandle>, RegistryError> {
        let sessions = self
            .sessions
            .lock()
            .or(Err(RegistryError::LockPoisoned))?;

        Ok(sessions.get(identity).cloned())
    }

    /// Removing an identity that is not registered does nothing.
    pub fn unregister(&self, identity: &str) -> Result<Option<SessionHandle>, RegistryError> {
        let mut sessions = self
            .sessions
            .lock()
            .or(Err(RegistryError::LockPoisoned))?;

        Ok(sessions.remove(identity))
    }

    pub fn identities(&self) -> Result<Vec<String>, RegistryError> {
        let sessions = self
            .sessions
            .lock()
            .or(Err(RegistryError::LockPoisoned))?;

        let mut identities: Vec<String> = sessions.keys().cloned().collect();
        identities.sort();
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(session_id: &str) -> (SessionHandle, mpsc::Receiver<SessionMessage>) {
        let (session_tx, session_rx) = mpsc::channel(4);
        (
            SessionHandle::new(Arc::new(session_id.to_string()), session_tx),
            session_rx,
        )
    }

    #[test]
    fn second_registration_is_rejected() {
        let registry = SessionRegistry::new();
        let (first, _first_rx) = handle("s1");
        let (second, _second_rx) = handle("s2");

        registry.register("a@mock", first.clone()).unwrap();

        assert_eq!(
            registry.register("a@mock", second),
            Err(RegistryError::DuplicateSession("a@mock".to_string()))
        );
        assert_eq!(registry.lookup("a@mock").unwrap(), Some(first));
    }

    #[test]
    fn unregister_is_idempotent() {
        let registry = SessionRegistry::new();
        let (first, _first_rx) = handle("s1");
        registry.register("a@mock", first).unwrap();

        assert!(registry.unregister("a@mock").unwrap().is_some());
        assert!(registry.unregister("a@mock").unwrap().is_none());
        assert_eq!(registry.lookup("a@mock").unwrap(), None);
        assert!(registry.identities().unwrap().is_empty());
    }

    #[test]
    fn identities_are_sorted() {
        let registry = SessionRegistry::new();
        let (first, _first_rx) = handle("s1");
        let (second, _second_rx) = handle("s2");
        registry.register("b@mock", first).unwrap();
        registry.register("a@mock", second).unwrap();

        assert_eq!(registry.identities().unwrap(), vec!["a@mock", "b@mock"]);
    }

    #[tokio::test]
    async fn bridge_to_closed_session() {
        let (handle, session_rx) = handle("s1");
        drop(session_rx);

        let command = FriendCommand {
            contact: "b@mock".to_string(),
            action: crate::admin::command::FriendAction::SendFriendRequest,
        };
        assert_eq!(handle.bridge(command).await, Err(BridgeError::SessionGone));
    }
}
