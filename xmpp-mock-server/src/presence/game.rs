use super::outcome::{Effect, Notice, Outcome};
use crate::errors::transition_error::TransitionError;
use crate::models::friend::GameActivity;
use crate::models::roster::Roster;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GameUpdate<'a> {
    pub title: Option<&'a str>,
    pub offer_id: Option<&'a str>,
    pub state: Option<&'a str>,
    pub broadcast: Option<&'a str>,
}

fn required(value: Option<&str>, field: &'static str) -> Result<Arc<String>, TransitionError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| Arc::new(value.to_string()))
        .ok_or(TransitionError::MissingGameField(field))
}

fn build_activity(update: &GameUpdate<'_>) -> Result<GameActivity, TransitionError> {
    Ok(GameActivity {
        title: required(update.title, "title")?,
        offer_id: required(update.offer_id, "offerId")?,
        state: required(update.state, "state")?,
        broadcast: update.broadcast.map(|url| Arc::new(url.to_string())),
        play_session: Arc::new(guid_create::GUID::rand().to_string().to_lowercase()),
    })
}

/// Starts (or replaces) what a friend is playing under a fresh play session.
pub fn change_game_state(roster: &mut Roster, identity: &str, update: GameUpdate<'_>) -> Outcome {
    let activity = match build_activity(&update) {
        Ok(activity) => activity,
        Err(error) => return Outcome::Rejected(error),
    };

    let mut friend = roster.get_or_synthesize(identity);
    friend.game = Some(activity);

    let from = friend.identity.clone();
    let snapshot = friend.snapshot();
    roster.update(friend);

    Outcome::Applied(vec![Effect::Inbound {
        from,
        notice: Notice::Presence(snapshot),
    }])
}

pub fn stop_playing(roster: &mut Roster, identity: &str) -> Outcome {
    let mut friend = roster.get_or_synthesize(identity);
    let Some(game) = friend.game.take() else {
        return Outcome::Rejected(TransitionError::NotPlaying(identity.to_string()));
    };

    let from = friend.identity.clone();
    let snapshot = friend.snapshot();
    roster.update(friend);

    Outcome::Applied(vec![Effect::Inbound {
        from,
        notice: Notice::StoppedPlaying {
            play_session: game.play_session,
            snapshot,
        },
    }])
}

/// Invites the local user into the friend's current play session.
pub fn join_game_request(roster: &Roster, identity: &str) -> Outcome {
    let Some(friend) = roster.get(identity) else {
        return Outcome::Rejected(TransitionError::UnknownContact(identity.to_string()));
    };
    let Some(activity) = friend.game.clone() else {
        return Outcome::Rejected(TransitionError::NotPlaying(identity.to_string()));
    };

    Outcome::Applied(vec![Effect::Inbound {
        from: friend.identity.clone(),
        notice: Notice::JoinInvite {
            name: friend.name.clone(),
            activity,
        },
    }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::friend::{Friend, Presence};

    fn playing_roster() -> (Roster, Arc<String>) {
        let mut roster = Roster::new();
        let mut friend = Friend::synthesize("b@mock");
        friend.presence = Presence::Online;
        roster.add(friend);

        change_game_state(
            &mut roster,
            "b@mock",
            GameUpdate {
                title: Some("Star Racer"),
                offer_id: Some("OFB-1"),
                state: Some("PLAYING"),
                broadcast: None,
            },
        );

        let play_session = roster.get("b@mock").unwrap().play_session().cloned().unwrap();
        (roster, play_session)
    }

    #[test]
    fn join_request_references_current_play_session() {
        let (roster, play_session) = playing_roster();

        let outcome = join_game_request(&roster, "b@mock");

        let [Effect::Inbound { notice: Notice::JoinInvite { activity, .. }, .. }] =
            outcome.effects()
        else {
            panic!("expected a join invite");
        };
        assert_eq!(activity.play_session, play_session);
    }

    #[test]
    fn every_change_gets_a_fresh_play_session() {
        let (mut roster, first) = playing_roster();

        change_game_state(
            &mut roster,
            "b@mock",
            GameUpdate {
                title: Some("Star Racer"),
                offer_id: Some("OFB-1"),
                state: Some("IN_MENU"),
                broadcast: Some("https://twitch.tv/b"),
            },
        );

        let game = roster.get("b@mock").unwrap().game.clone().unwrap();
        assert_ne!(game.play_session, first);
        assert_eq!(*game.state, "IN_MENU");
    }

    #[test]
    fn missing_fields_are_rejected_without_changes() {
        let (mut roster, play_session) = playing_roster();

        let outcome = change_game_state(
            &mut roster,
            "b@mock",
            GameUpdate {
                title: Some("Other"),
                offer_id: Some(" "),
                state: Some("PLAYING"),
                broadcast: None,
            },
        );

        assert_eq!(
            outcome,
            Outcome::Rejected(TransitionError::MissingGameField("offerId"))
        );
        assert_eq!(
            roster.get("b@mock").unwrap().play_session(),
            Some(&play_session)
        );
    }

    #[test]
    fn stop_playing_clears_session_once() {
        let (mut roster, play_session) = playing_roster();

        let outcome = stop_playing(&mut roster, "b@mock");
        assert!(matches!(
            &outcome.effects()[0],
            Effect::Inbound { notice: Notice::StoppedPlaying { play_session: stopped, .. }, .. }
                if *stopped == play_session
        ));
        assert!(roster.get("b@mock").unwrap().game.is_none());

        assert_eq!(
            stop_playing(&mut roster, "b@mock"),
            Outcome::Rejected(TransitionError::NotPlaying("b@mock".to_string()))
        );
        assert_eq!(roster.get("b@mock").unwrap().presence, Presence::Online);
    }

    #[test]
    fn join_request_without_game_is_rejected() {
        let mut roster = Roster::new();
        roster.add(Friend::synthesize("b@mock"));

        assert_eq!(
            join_game_request(&roster, "b@mock"),
            Outcome::Rejected(TransitionError::NotPlaying("b@mock".to_string()))
        );
    }

    #[test]
    fn join_request_from_unknown_contact_is_rejected() {
        let roster = Roster::new();

        assert_eq!(
            join_game_request(&roster, "nobody@mock"),
            Outcome::Rejected(TransitionError::UnknownContact("nobody@mock".to_string()))
        );
    }
}
