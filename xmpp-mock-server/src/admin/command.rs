use crate::errors::bridge_error::BridgeError;
use crate::errors::transition_error::TransitionError;
use serde_json::Value;

/// What a fake friend can do to the local user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FriendAction {
    SendMessage {
        body: String,
    },
    SendFriendRequest,
    AcceptFriendRequest,
    RejectFriendRequest,
    RevokeFriendRequest,
    RemoveFriend,
    ChangePresence {
        presence: String,
        status: Option<String>,
    },
    ChangeGameState {
        title: Option<String>,
        offer_id: Option<String>,
        state: Option<String>,
        twitch: Option<String>,
    },
    StopPlaying,
    SendJoinGameInvite,
}

/// Parameter as text; numbers and booleans are accepted as written.
pub(crate) fn text(params: &Value, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(value) => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

impl FriendAction {
    pub fn parse(action: &str, params: &Value) -> Result<FriendAction, BridgeError> {
        let action = match action {
            "sendMessage" => FriendAction::SendMessage {
                body: text(params, "body").ok_or(BridgeError::MissingParameter("body"))?,
            },
            "sendFriendRequest" => FriendAction::SendFriendRequest,
            "acceptFriendRequest" => FriendAction::AcceptFriendRequest,
            "rejectFriendRequest" => FriendAction::RejectFriendRequest,
            "revokeFriendRequest" => FriendAction::RevokeFriendRequest,
            "removeFriend" => FriendAction::RemoveFriend,
            "changePresence" => FriendAction::ChangePresence {
                presence: text(params, "presence")
                    .ok_or(BridgeError::MissingParameter("presence"))?,
                status: text(params, "status"),
            },
            "changeGameState" => FriendAction::ChangeGameState {
                title: text(params, "title"),
                offer_id: text(params, "offerId"),
                state: text(params, "state"),
                twitch: text(params, "twitch"),
            },
            "stopPlaying" => FriendAction::StopPlaying,
            "sendJoinGameInvite" => FriendAction::SendJoinGameInvite,
            _ => return Err(BridgeError::UnknownAction(action.to_string())),
        };

        Ok(action)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FriendAction::SendMessage { .. } => "sendMessage",
            FriendAction::SendFriendRequest => "sendFriendRequest",
            FriendAction::AcceptFriendRequest => "acceptFriendRequest",
            FriendAction::RejectFriendRequest => "rejectFriendRequest",
            FriendAction::RevokeFriendRequest => "revokeFriendRequest",
            FriendAction::RemoveFriend => "removeFriend",
            FriendAction::ChangePresence { .. } => "changePresence",
            FriendAction::ChangeGameState { .. } => "changeGameState",
            FriendAction::StopPlaying => "stopPlaying",
            FriendAction::SendJoinGameInvite => "sendJoinGameInvite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendCommand {
    pub contact: String,
    pub action: FriendAction,
}

/// How the session answered a bridge call.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeReply {
    /// Applied; carries the friend as it is now.
    Done(Value),
    Ignored,
    Failed(TransitionError),
}
