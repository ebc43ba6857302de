use super::command::{FriendAction, text};
use crate::errors::bridge_error::BridgeError;
use rand::Rng;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const PRESENCES: [&str; 4] = ["ONLINE", "AWAY", "OFFLINE", "INVISIBLE"];

const STATUSES: [&str; 5] = [
    "Around",
    "In a meeting",
    "Back in 5",
    "Looking for a squad",
    "Do not disturb",
];

const MESSAGES: [&str; 6] = [
    "hey",
    "are you there?",
    "gg",
    "one more round?",
    "brb",
    "check out this clip",
];

const TITLES: [(&str, &str); 4] = [
    ("Battle Arena", "OFB-EAST:1001"),
    ("Kart Racer", "OFB-EAST:1002"),
    ("Farm Story", "OFB-EAST:1003"),
    ("Puzzle Towers", "OFB-EAST:1004"),
];

const GAME_STATES: [&str; 3] = ["INGAME", "LOBBY", "MATCHMAKING"];

const DEFAULT_INTERVAL_MS: u64 = 1000;
const DEFAULT_DELAY_MS: u64 = 500;

/// Randomized change applied to a slice of the roster on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Presence,
    Messages,
    GameStates,
}

impl Generator {
    /// One random action for a friend.
    pub fn pick(&self, rng: &mut impl Rng) -> FriendAction {
        match self {
            Generator::Presence => FriendAction::ChangePresence {
                presence: choose(&PRESENCES, rng).to_string(),
                status: rng
                    .random_bool(0.5)
                    .then(|| choose(&STATUSES, rng).to_string()),
            },
            Generator::Messages => FriendAction::SendMessage {
                body: choose(&MESSAGES, rng).to_string(),
            },
            Generator::GameStates => {
                if rng.random_bool(0.25) {
                    return FriendAction::StopPlaying;
                }

                let (title, offer_id) = choose(&TITLES, rng);
                FriendAction::ChangeGameState {
                    title: Some(title.to_string()),
                    offer_id: Some(offer_id.to_string()),
                    state: Some(choose(&GAME_STATES, rng).to_string()),
                    twitch: None,
                }
            }
        }
    }

    /// Actions for every friend of the slice.
    pub fn actions(&self, friends: &[Arc<String>]) -> Vec<(Arc<String>, FriendAction)> {
        let mut rng = rand::rng();
        friends
            .iter()
            .map(|friend| (friend.clone(), self.pick(&mut rng)))
            .collect()
    }
}

fn choose<T: Copy>(values: &[T], rng: &mut impl Rng) -> T {
    values[rng.random_range(0..values.len())]
}

/// Session-wide actions of the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkAction {
    Start {
        steps: Vec<(Duration, Generator)>,
        interval: Duration,
        start: usize,
        count: Option<usize>,
    },
    StopJobs,
}

fn number(params: &Value, key: &'static str) -> Result<Option<u64>, BridgeError> {
    match text(params, key) {
        Some(value) => value
            .parse()
            .map(Some)
            .or(Err(BridgeError::InvalidParameters(format!("{key} is not a number")))),
        None => Ok(None),
    }
}

impl BulkAction {
    pub fn parse(action: &str, params: &Value) -> Result<BulkAction, BridgeError> {
        if action == "stopJobs" {
            return Ok(BulkAction::StopJobs);
        }

        let steps = match action {
            "randomPresence" => vec![(Duration::ZERO, Generator::Presence)],
            "randomMessages" => vec![(Duration::ZERO, Generator::Messages)],
            "randomGameStates" => vec![(Duration::ZERO, Generator::GameStates)],
            "combine" => {
                let delay = Duration::from_millis(
                    number(params, "delay")?.unwrap_or(DEFAULT_DELAY_MS),
                );
                vec![
                    (Duration::ZERO, Generator::Presence),
                    (delay, Generator::Messages),
                    (delay, Generator::GameStates),
                ]
            }
            _ => return Err(BridgeError::UnknownAction(action.to_string())),
        };

        Ok(BulkAction::Start {
            steps,
            interval: Duration::from_millis(
                number(params, "interval")?
                    .unwrap_or(DEFAULT_INTERVAL_MS)
                    .max(1),
            ),
            start: number(params, "start")?.unwrap_or(0) as usize,
            count: number(params, "count")?.map(|count| count as usize),
        })
    }
}
