use super::outcome::{Effect, Notice, Outcome};
use crate::models::friend::ReceivedMessage;
use crate::models::roster::Roster;
use chrono::Utc;
use std::sync::Arc;

/// Keeps the last chat body the local user sent to a friend.
pub fn record_sent(roster: &mut Roster, identity: &str, body: &str) -> Outcome {
    let Some(friend) = roster.get_mut(identity) else {
        return Outcome::Ignored;
    };

    friend.recv_msg = Some(ReceivedMessage {
        body: Arc::new(body.to_string()),
        received_at: Utc::now(),
    });

    Outcome::Applied(Vec::new())
}

/// A friend chats to the local user.
pub fn deliver(roster: &Roster, identity: &str, body: &str) -> Outcome {
    let friend = roster.get_or_synthesize(identity);

    Outcome::Applied(vec![Effect::Inbound {
        from: friend.identity,
        notice: Notice::Chat {
            body: Arc::new(body.to_string()),
        },
    }])
}
