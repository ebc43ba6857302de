use super::outcome::{Effect, Notice, Origin, Outcome, RosterItem, notify};
use crate::models::friend::{Ask, Friend, Presence, Subscription};
use crate::models::roster::Roster;
use std::sync::Arc;

/// Opens a subscription request between the local user and `identity`.
pub fn request(roster: &mut Roster, identity: &str, origin: Origin) -> Outcome {
    if roster
        .get(identity)
        .is_some_and(|friend| friend.subscription != Subscription::None)
    {
        return Outcome::Ignored;
    }

    let mut friend = roster.get_or_synthesize(identity);
    if !roster.contains(identity) {
        friend.from_request = true;
    }

    friend.subscription = Subscription::None;
    friend.ask = Ask::Subscribe;
    friend.incoming_request = origin == Origin::Contact;

    let item = RosterItem::of(&friend);
    let contact = friend.identity.clone();
    roster.add(friend);

    let mut effects = vec![notify(origin, &contact, Notice::Subscribe)];
    if origin == Origin::LocalUser {
        effects.push(Effect::RosterPush {
            item,
            then: Vec::new(),
        });
    }

    Outcome::Applied(effects)
}

/// Whether `friend` holds a request that `origin` opened itself.
fn opened_by(friend: &Friend, origin: Origin) -> bool {
    friend.subscription == Subscription::None
        && friend.ask == Ask::Subscribe
        && friend.incoming_request == (origin == Origin::Contact)
}

/// The other side of `origin`, the one a pending request must come from to be answered.
fn answering(origin: Origin) -> Origin {
    match origin {
        Origin::LocalUser => Origin::Contact,
        Origin::Contact => Origin::LocalUser,
    }
}

/// Withdraws an outstanding request opened by `origin`.
pub fn revoke(roster: &mut Roster, identity: &str, origin: Origin) -> Outcome {
    if !roster
        .get(identity)
        .is_some_and(|friend| opened_by(friend, origin))
    {
        return Outcome::Ignored;
    }

    let Some(mut friend) = roster.remove(identity) else {
        return Outcome::Ignored;
    };

    friend.subscription = Subscription::None;
    friend.ask = Ask::Null;
    friend.incoming_request = false;

    let mut effects = vec![notify(origin, &friend.identity, Notice::Unsubscribe)];
    if origin == Origin::LocalUser {
        effects.push(Effect::RosterPush {
            item: RosterItem::removal(&friend),
            then: Vec::new(),
        });
    }

    Outcome::Applied(effects)
}

/// Accepts a request the other side opened. The friend's presence reaches the local
/// user only after the client has acknowledged the roster push.
pub fn accept(roster: &mut Roster, identity: &str, origin: Origin) -> Outcome {
    let Some(mut friend) = roster
        .get(identity)
        .filter(|friend| opened_by(friend, answering(origin)))
        .cloned()
    else {
        return Outcome::Ignored;
    };

    friend.subscription = Subscription::Both;
    friend.ask = Ask::Null;
    friend.from_request = false;
    friend.incoming_request = false;

    let item = RosterItem::of(&friend);
    let snapshot = friend.snapshot();
    let contact = friend.identity.clone();
    roster.update(friend);

    Outcome::Applied(vec![
        notify(origin, &contact, Notice::Subscribed),
        Effect::RosterPush {
            item,
            then: vec![Effect::Inbound {
                from: contact.clone(),
                notice: Notice::Presence(snapshot),
            }],
        },
    ])
}

/// Declines a request the other side opened. A friend that only existed for the
/// request leaves the roster.
pub fn reject(roster: &mut Roster, identity: &str, origin: Origin) -> Outcome {
    let Some(mut friend) = roster
        .get(identity)
        .filter(|friend| opened_by(friend, answering(origin)))
        .cloned()
    else {
        return Outcome::Ignored;
    };

    // Requests from the friend are never pushed, so the client has nothing to undo
    let pushed = !friend.incoming_request;

    friend.subscription = Subscription::None;
    friend.ask = Ask::Null;
    friend.incoming_request = false;

    let mut effects = vec![notify(origin, &friend.identity, Notice::Unsubscribed)];
    let item = if friend.from_request {
        roster.remove(identity);
        RosterItem::removal(&friend)
    } else {
        let item = RosterItem::of(&friend);
        roster.update(friend);
        item
    };

    if pushed {
        effects.push(Effect::RosterPush {
            item,
            then: Vec::new(),
        });
    }

    Outcome::Applied(effects)
}

/// Drops a friend whatever the subscription: offline first, then unsubscribed,
/// then the roster removal.
pub fn remove(roster: &mut Roster, identity: &str, origin: Origin) -> Outcome {
    let Some(mut friend) = roster.remove(identity) else {
        return Outcome::Ignored;
    };

    friend.presence = Presence::Offline;
    friend.game = None;
    let offline = Effect::Inbound {
        from: friend.identity.clone(),
        notice: Notice::Presence(friend.snapshot()),
    };

    friend.subscription = Subscription::None;
    friend.ask = Ask::Null;

    Outcome::Applied(vec![
        offline,
        notify(origin, &friend.identity, Notice::Unsubscribed),
        Effect::RosterPush {
            item: RosterItem::removal(&friend),
            then: Vec::new(),
        },
    ])
}

/// The local user adds or renames a roster entry; the subscription stays as it is.
pub fn add_contact(roster: &mut Roster, identity: &str, name: Option<&str>) -> Outcome {
    let mut friend = roster.get_or_synthesize(identity);
    if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
        friend.name = Arc::new(name.to_string());
    }

    let item = RosterItem::of(&friend);
    roster.add(friend);

    Outcome::Applied(vec![Effect::RosterPush {
        item,
        then: Vec::new(),
    }])
}
