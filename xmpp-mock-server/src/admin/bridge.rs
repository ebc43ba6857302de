use super::command::{BridgeReply, FriendAction};
use crate::models::roster::Roster;
use crate::presence::game::GameUpdate;
use crate::presence::outcome::{Origin, Outcome};
use crate::presence::{availability, chat, game, subscription};
use serde_json::{Value, json};

/// Runs a friend action against the roster as if the friend had sent it.
pub fn transition(roster: &mut Roster, contact: &str, action: &FriendAction) -> Outcome {
    match action {
        FriendAction::SendMessage { body } => chat::deliver(roster, contact, body),
        FriendAction::SendFriendRequest => subscription::request(roster, contact, Origin::Contact),
        FriendAction::AcceptFriendRequest => subscription::accept(roster, contact, Origin::Contact),
        FriendAction::RejectFriendRequest => subscription::reject(roster, contact, Origin::Contact),
        FriendAction::RevokeFriendRequest => subscription::revoke(roster, contact, Origin::Contact),
        FriendAction::RemoveFriend => subscription::remove(roster, contact, Origin::Contact),
        FriendAction::ChangePresence { presence, status } => {
            availability::set_presence(roster, contact, presence, status.as_deref())
        }
        FriendAction::ChangeGameState {
            title,
            offer_id,
            state,
            twitch,
        } => game::change_game_state(
            roster,
            contact,
            GameUpdate {
                title: title.as_deref(),
                offer_id: offer_id.as_deref(),
                state: state.as_deref(),
                broadcast: twitch.as_deref(),
            },
        ),
        FriendAction::StopPlaying => game::stop_playing(roster, contact),
        FriendAction::SendJoinGameInvite => game::join_game_request(roster, contact),
    }
}

/// The friend as the local user's roster sees it.
pub fn summary(roster: &Roster, contact: &str) -> Value {
    let friend = roster.get_or_synthesize(contact);

    json!({
        "identity": friend.identity.as_str(),
        "name": friend.name.as_str(),
        "inRoster": roster.contains(contact),
        "subscription": friend.subscription.as_str(),
        "ask": friend.ask.as_str(),
        "presence": friend.presence.as_str(),
        "status": friend.status.as_deref(),
        "playSession": friend.play_session().map(|session| session.as_str()),
    })
}

pub fn reply(outcome: &Outcome, roster: &Roster, contact: &str) -> BridgeReply {
    match outcome {
        Outcome::Applied(_) => BridgeReply::Done(summary(roster, contact)),
        Outcome::Ignored => BridgeReply::Ignored,
        Outcome::Rejected(error) => BridgeReply::Failed(error.clone()),
    }
}
