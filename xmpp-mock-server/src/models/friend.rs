use crate::errors::transition_error::TransitionError;
use crate::models::identity;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subscription {
    #[default]
    None,
    To,
    From,
    Both,
}

impl Subscription {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subscription::None => "none",
            Subscription::To => "to",
            Subscription::From => "from",
            Subscription::Both => "both",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ask {
    #[default]
    Null,
    Subscribe,
}

impl Ask {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Ask::Null => None,
            Ask::Subscribe => Some("subscribe"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Presence {
    Online,
    Away,
    #[default]
    Offline,
    Invisible,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Online => "ONLINE",
            Presence::Away => "AWAY",
            Presence::Offline => "OFFLINE",
            Presence::Invisible => "INVISIBLE",
        }
    }

    /// Offline and invisible look the same to whoever receives the presence.
    pub fn is_available(&self) -> bool {
        matches!(self, Presence::Online | Presence::Away)
    }
}

impl FromStr for Presence {
    type Err = TransitionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "ONLINE" => Ok(Presence::Online),
            "AWAY" => Ok(Presence::Away),
            "OFFLINE" => Ok(Presence::Offline),
            "INVISIBLE" => Ok(Presence::Invisible),
            _ => Err(TransitionError::UnknownPresence(value.to_string())),
        }
    }
}

/// What a friend is currently playing. `play_session` correlates the later
/// "stopped playing" and join invites with this start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameActivity {
    pub title: Arc<String>,
    pub offer_id: Arc<String>,
    pub state: Arc<String>,
    pub broadcast: Option<Arc<String>>,
    pub play_session: Arc<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub body: Arc<String>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub presence: Presence,
    pub status: Option<Arc<String>>,
    pub game: Option<GameActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    pub identity: Arc<String>,
    pub name: Arc<String>,
    pub persona_id: Arc<String>,
    pub external_id: Arc<String>,
    pub subscription: Subscription,
    pub ask: Ask,
    pub presence: Presence,
    pub status: Option<Arc<String>>,
    pub game: Option<GameActivity>,
    pub recv_msg: Option<ReceivedMessage>,
    /// Set when the friend only exists because of a pending subscription request.
    pub from_request: bool,
    /// Set while the pending request was opened by the friend rather than the local user.
    pub incoming_request: bool,
}

impl Friend {
    pub fn new(identity: Arc<String>, name: Arc<String>) -> Self {
        Friend {
            persona_id: name.clone(),
            identity,
            name,
            external_id: Arc::new(String::new()),
            subscription: Subscription::None,
            ask: Ask::Null,
            presence: Presence::Offline,
            status: None,
            game: None,
            recv_msg: None,
            from_request: false,
            incoming_request: false,
        }
    }

    /// Builds a friend for an identity nobody loaded, named after its local part.
    pub fn synthesize(identity: &str) -> Self {
        Friend::new(
            Arc::new(identity.to_string()),
            Arc::new(identity::local_part(identity).to_string()),
        )
    }

    pub fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            presence: self.presence,
            status: self.status.clone(),
            game: self.game.clone(),
        }
    }

    pub fn play_session(&self) -> Option<&Arc<String>> {
        self.game.as_ref().map(|game| &game.play_session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_friend_is_named_after_local_part() {
        let friend = Friend::synthesize("x@domain");

        assert_eq!(*friend.name, "x");
        assert_eq!(friend.subscription, Subscription::None);
        assert_eq!(friend.ask, Ask::Null);
        assert_eq!(friend.presence, Presence::Offline);
        assert!(friend.play_session().is_none());
    }

    #[test]
    fn presence_parses_case_insensitively() {
        assert_eq!("away".parse::<Presence>(), Ok(Presence::Away));
        assert_eq!("INVISIBLE".parse::<Presence>(), Ok(Presence::Invisible));
        assert_eq!(
            "NOT_A_REAL_VALUE".parse::<Presence>(),
            Err(TransitionError::UnknownPresence(
                "NOT_A_REAL_VALUE".to_string()
            ))
        );
    }
}
