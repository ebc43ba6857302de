use super::{
    NS_BIND, NS_CLIENT, NS_GAME, NS_PRIVACY, NS_ROSTER, NS_SASL, NS_SESSION, NS_STREAM_ERRORS,
    NS_STREAMS,
};
use crate::models::friend::{GameActivity, Presence, PresenceSnapshot};
use crate::presence::outcome::{Notice, RosterItem};
use quick_xml::escape::escape;

pub const STREAM_CLOSE: &str = "</stream:stream>";

pub fn stream_header(domain: &str, stream_id: &str) -> String {
    format!(
        "<?xml version='1.0'?><stream:stream xmlns='{NS_CLIENT}' xmlns:stream='{NS_STREAMS}' id='{stream_id}' from='{}' version='1.0'>",
        escape(domain)
    )
}

/// First advertisement offers authentication, the second one binding.
pub fn features(bind: bool) -> String {
    if bind {
        format!(
            "<stream:features><bind xmlns='{NS_BIND}'/><session xmlns='{NS_SESSION}'/></stream:features>"
        )
    } else {
        format!(
            "<stream:features><mechanisms xmlns='{NS_SASL}'><mechanism>PLAIN</mechanism></mechanisms></stream:features>"
        )
    }
}

pub fn auth_success() -> String {
    format!("<success xmlns='{NS_SASL}'/>")
}

pub fn auth_failure() -> String {
    format!("<failure xmlns='{NS_SASL}'><temporary-auth-failure/></failure>")
}

pub fn conflict() -> String {
    format!("<stream:error><conflict xmlns='{NS_STREAM_ERRORS}'/></stream:error>")
}

pub fn iq_result(id: &str, to: &str) -> String {
    format!("<iq type='result' id='{}' to='{}'/>", escape(id), escape(to))
}

pub fn bind_result(id: &str, jid: &str) -> String {
    format!(
        "<iq type='result' id='{}'><bind xmlns='{NS_BIND}'><jid>{}</jid></bind></iq>",
        escape(id),
        escape(jid)
    )
}

fn roster_item(item: &RosterItem) -> String {
    let subscription = if item.remove {
        "remove"
    } else {
        item.subscription.as_str()
    };

    let ask = match item.ask.as_str() {
        Some(ask) if !item.remove => format!(" ask='{ask}'"),
        _ => String::new(),
    };

    format!(
        "<item jid='{}' name='{}' subscription='{subscription}'{ask}/>",
        escape(item.identity.as_str()),
        escape(item.name.as_str())
    )
}

pub fn roster_result<'a>(
    id: &str,
    to: &str,
    items: impl Iterator<Item = &'a RosterItem>,
) -> String {
    let items: String = items.map(roster_item).collect();
    format!(
        "<iq type='result' id='{}' to='{}'><query xmlns='{NS_ROSTER}'>{items}</query></iq>",
        escape(id),
        escape(to)
    )
}

pub fn roster_push(id: &str, to: &str, item: &RosterItem) -> String {
    format!(
        "<iq type='set' id='{}' to='{}'><query xmlns='{NS_ROSTER}'>{}</query></iq>",
        escape(id),
        escape(to),
        roster_item(item)
    )
}

pub fn privacy_result(id: &str, to: &str, blocked: &[String]) -> String {
    let items: String = blocked
        .iter()
        .enumerate()
        .map(|(order, jid)| {
            format!(
                "<item type='jid' value='{}' action='deny' order='{}'/>",
                escape(jid.as_str()),
                order + 1
            )
        })
        .collect();

    format!(
        "<iq type='result' id='{}' to='{}'><query xmlns='{NS_PRIVACY}'><list name='blocked'>{items}</list></query></iq>",
        escape(id),
        escape(to)
    )
}

pub fn subscription(from: &str, to: &str, kind: &str) -> String {
    format!(
        "<presence from='{}' to='{}' type='{kind}'/>",
        escape(from),
        escape(to)
    )
}

fn game(activity: &GameActivity, state: &str) -> String {
    let broadcast = activity
        .broadcast
        .as_ref()
        .map(|url| format!(" broadcast='{}'", escape(url.as_str())))
        .unwrap_or_default();

    format!(
        "<game xmlns='{NS_GAME}' title='{}' offer='{}' state='{}' session='{}'{broadcast}/>",
        escape(activity.title.as_str()),
        escape(activity.offer_id.as_str()),
        escape(state),
        escape(activity.play_session.as_str())
    )
}

fn presence_with(from: &str, to: &str, snapshot: &PresenceSnapshot, extra: &str) -> String {
    let mut children = String::new();
    let kind = if snapshot.presence.is_available() {
        if snapshot.presence == Presence::Away {
            children.push_str("<show>away</show>");
        }

        if let Some(status) = &snapshot.status {
            children.push_str(&format!("<status>{}</status>", escape(status.as_str())));
        }

        if let Some(activity) = &snapshot.game {
            children.push_str(&game(activity, &activity.state));
        }
        ""
    } else {
        " type='unavailable'"
    };
    children.push_str(extra);

    if children.is_empty() {
        format!("<presence from='{}' to='{}'{kind}/>", escape(from), escape(to))
    } else {
        format!(
            "<presence from='{}' to='{}'{kind}>{children}</presence>",
            escape(from),
            escape(to)
        )
    }
}

pub fn presence(from: &str, to: &str, snapshot: &PresenceSnapshot) -> String {
    presence_with(from, to, snapshot, "")
}

/// Presence that closes a play session; the game element keeps the old session id.
pub fn stopped_playing(
    from: &str,
    to: &str,
    play_session: &str,
    snapshot: &PresenceSnapshot,
) -> String {
    let stopped = format!(
        "<game xmlns='{NS_GAME}' state='stopped' session='{}'/>",
        escape(play_session)
    );
    presence_with(from, to, snapshot, &stopped)
}

pub fn join_invite(from: &str, to: &str, name: &str, activity: &GameActivity) -> String {
    format!(
        "<message from='{}' to='{}' type='headline'><body>{} invited you to join {}</body>{}</message>",
        escape(from),
        escape(to),
        escape(name),
        escape(activity.title.as_str()),
        game(activity, "invite")
    )
}

pub fn chat(from: &str, to: &str, body: &str) -> String {
    format!(
        "<message from='{}' to='{}' type='chat'><body>{}</body></message>",
        escape(from),
        escape(to),
        escape(body)
    )
}

/// Renders a transition notice as the stanza `to` receives from `from`.
pub fn notice(from: &str, to: &str, notice: &Notice) -> String {
    match notice {
        Notice::Subscribe => subscription(from, to, "subscribe"),
        Notice::Subscribed => subscription(from, to, "subscribed"),
        Notice::Unsubscribe => subscription(from, to, "unsubscribe"),
        Notice::Unsubscribed => subscription(from, to, "unsubscribed"),
        Notice::Presence(snapshot) => presence(from, to, snapshot),
        Notice::StoppedPlaying {
            play_session,
            snapshot,
        } => stopped_playing(from, to, play_session, snapshot),
        Notice::JoinInvite { name, activity } => join_invite(from, to, name, activity),
        Notice::Chat { body } => chat(from, to, body),
    }
}
