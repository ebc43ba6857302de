use super::outcome::{Effect, Notice, Outcome};
use crate::models::friend::Presence;
use crate::models::roster::Roster;
use std::sync::Arc;

/// Overwrites a friend's presence. Unknown values leave the friend as it was.
pub fn set_presence(
    roster: &mut Roster,
    identity: &str,
    value: &str,
    status: Option<&str>,
) -> Outcome {
    let presence = match value.parse::<Presence>() {
        Ok(presence) => presence,
        Err(error) => return Outcome::Rejected(error),
    };

    let mut friend = roster.get_or_synthesize(identity);
    friend.presence = presence;
    if let Some(status) = status {
        friend.status = Some(Arc::new(status.to_string()));
    }

    let from = friend.identity.clone();
    let snapshot = friend.snapshot();
    roster.update(friend);

    Outcome::Applied(vec![Effect::Inbound {
        from,
        notice: Notice::Presence(snapshot),
    }])
}

/// The local user told us a friend went away.
pub fn mark_offline(roster: &mut Roster, identity: &str) -> Outcome {
    match roster.get_mut(identity) {
        Some(friend) => {
            friend.presence = Presence::Offline;
            Outcome::Applied(Vec::new())
        }
        None => Outcome::Ignored,
    }
}
