use super::friend::Friend;
use std::collections::HashMap;
use std::sync::Arc;

/// Friends of one session, keyed by identity and dumped in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    friends: HashMap<String, Friend>,
    order: Vec<Arc<String>>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Inserts or replaces by identity. A replaced friend keeps its position.
    pub fn add(&mut self, friend: Friend) {
        let identity = friend.identity.clone();
        if self.friends.insert(identity.to_string(), friend).is_none() {
            self.order.push(identity);
        }
    }

    /// Replaces a friend that is already in the roster; transient friends are dropped.
    pub fn update(&mut self, friend: Friend) -> bool {
        match self.friends.get_mut(friend.identity.as_str()) {
            Some(existing) => {
                *existing = friend;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, identity: &str) -> Option<Friend> {
        let friend = self.friends.remove(identity)?;
        self.order.retain(|entry| entry.as_str() != identity);
        Some(friend)
    }

    pub fn get(&self, identity: &str) -> Option<&Friend> {
        self.friends.get(identity)
    }

    pub fn get_mut(&mut self, identity: &str) -> Option<&mut Friend> {
        self.friends.get_mut(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.friends.contains_key(identity)
    }

    pub fn all(&self) -> impl Iterator<Item = &Friend> {
        self.order
            .iter()
            .filter_map(|identity| self.friends.get(identity.as_str()))
    }

    /// Friend from the roster, or a transient one that is not inserted.
    pub fn get_or_synthesize(&self, identity: &str) -> Friend {
        self.get(identity)
            .cloned()
            .unwrap_or_else(|| Friend::synthesize(identity))
    }

    /// Identities in `start..start + count`, clamped to the roster.
    pub fn slice(&self, start: usize, count: Option<usize>) -> Vec<Arc<String>> {
        let count = count.unwrap_or(self.order.len());
        self.order.iter().skip(start).take(count).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
