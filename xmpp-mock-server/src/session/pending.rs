use crate::presence::outcome::Effect;
use std::collections::HashMap;

/// What to do once the client acknowledges a roster push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub then: Vec<Effect>,
    /// Id of the client request that is answered after the push is acknowledged.
    pub reply_to: Option<String>,
}

/// Roster pushes waiting for the client's result, keyed by correlation token.
#[derive(Debug, Default)]
pub struct PendingRequests {
    next_id: u64,
    entries: HashMap<String, PendingRequest>,
}

impl PendingRequests {
    pub fn new() -> Self {
        PendingRequests::default()
    }

    /// Stores the continuation under the next token of this session.
    pub fn issue(&mut self, request: PendingRequest) -> String {
        self.next_id += 1;
        let token = self.next_id.to_string();
        self.entries.insert(token.clone(), request);
        token
    }

    pub fn resume(&mut self, token: &str) -> Option<PendingRequest> {
        self.entries.remove(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Abandons every entry, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let abandoned = self.entries.len();
        self.entries.clear();
        abandoned
    }
}
