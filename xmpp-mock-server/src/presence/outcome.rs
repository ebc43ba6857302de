use crate::errors::transition_error::TransitionError;
use crate::models::friend::{Ask, Friend, GameActivity, PresenceSnapshot, Subscription};
use std::sync::Arc;

/// Who triggered a transition: the connected client, or the friend (through the bridge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    LocalUser,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Presence(PresenceSnapshot),
    StoppedPlaying {
        play_session: Arc<String>,
        snapshot: PresenceSnapshot,
    },
    JoinInvite {
        name: Arc<String>,
        activity: GameActivity,
    },
    Chat {
        body: Arc<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterItem {
    pub identity: Arc<String>,
    pub name: Arc<String>,
    pub subscription: Subscription,
    pub ask: Ask,
    pub remove: bool,
}

impl RosterItem {
    pub fn of(friend: &Friend) -> Self {
        RosterItem {
            identity: friend.identity.clone(),
            name: friend.name.clone(),
            subscription: friend.subscription,
            ask: friend.ask,
            remove: false,
        }
    }

    pub fn removal(friend: &Friend) -> Self {
        RosterItem {
            remove: true,
            ..RosterItem::of(friend)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Sent by the friend to the local user.
    Inbound { from: Arc<String>, notice: Notice },
    /// Sent by the local user to the friend, who has no live connection.
    Outbound { to: Arc<String>, notice: Notice },
    /// Roster change pushed to the local user; `then` is delivered once the client
    /// acknowledges the push.
    RosterPush { item: RosterItem, then: Vec<Effect> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied(Vec<Effect>),
    Ignored,
    Rejected(TransitionError),
}

impl Outcome {
    pub fn effects(&self) -> &[Effect] {
        match self {
            Outcome::Applied(effects) => effects,
            _ => &[],
        }
    }
}

/// Subscription notices travel away from whoever triggered them.
pub(crate) fn notify(origin: Origin, contact: &Arc<String>, notice: Notice) -> Effect {
    match origin {
        Origin::LocalUser => Effect::Outbound {
            to: contact.clone(),
            notice,
        },
        Origin::Contact => Effect::Inbound {
            from: contact.clone(),
            notice,
        },
    }
}
