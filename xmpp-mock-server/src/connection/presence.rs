use super::Connection;
use crate::errors::server_error::ServerError;
use crate::models::friend::{Presence, Subscription};
use crate::presence::outcome::{Effect, Notice, Origin, Outcome};
use crate::presence::{availability, chat, subscription};
use crate::transport::{InboundTransport, OutboundTransport};
use crate::xmpp::stanza::{MessageStanza, PresenceKind, PresenceStanza};
use log::{debug, warn};
use std::sync::Arc;

impl<I: InboundTransport, O: OutboundTransport> Connection<I, O> {
    pub(super) async fn handle_presence(
        &mut self,
        presence: PresenceStanza,
    ) -> Result<(), ServerError> {
        let Some(session) = self.session.as_mut() else {
            warn!("Dropped presence before authentication");
            return Ok(());
        };

        let roster = &mut session.roster;
        let outcome = match (presence.kind, presence.to.as_deref()) {
            (PresenceKind::Subscribe, Some(to)) => {
                subscription::request(roster, to, Origin::LocalUser)
            }
            (PresenceKind::Unsubscribe, Some(to)) => {
                subscription::revoke(roster, to, Origin::LocalUser)
            }
            (PresenceKind::Subscribed, Some(to)) => {
                subscription::accept(roster, to, Origin::LocalUser)
            }
            (PresenceKind::Unsubscribed, Some(to)) => {
                subscription::reject(roster, to, Origin::LocalUser)
            }
            (PresenceKind::Unavailable, Some(to)) => availability::mark_offline(roster, to),

            (PresenceKind::Unavailable, None) => {
                session.local_user.presence = Presence::Offline;
                Outcome::Ignored
            }

            (PresenceKind::Available, None) => {
                return self
                    .update_own_presence(presence.show.as_deref(), presence.status)
                    .await;
            }

            (PresenceKind::Available, Some(to)) => {
                debug!("Directed presence to {to} has no peer to reach");
                Outcome::Ignored
            }

            (PresenceKind::Other(kind), _) => {
                warn!("Unhandled presence type {kind}");
                Outcome::Ignored
            }

            (kind, None) => {
                warn!("Presence {kind:?} without an addressee");
                Outcome::Ignored
            }
        };

        self.apply(outcome, None).await
    }

    /// The first available presence of a session is answered with the presence of
    /// every mutual friend who is online.
    async fn update_own_presence(
        &mut self,
        show: Option<&str>,
        status: Option<String>,
    ) -> Result<(), ServerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        session.local_user.presence = match show {
            Some("away" | "xa" | "dnd") => Presence::Away,
            _ => Presence::Online,
        };
        session.local_user.status = status.map(Arc::new);

        if session.announced {
            return Ok(());
        }
        session.announced = true;

        let effects = session
            .roster
            .all()
            .filter(|friend| friend.subscription == Subscription::Both)
            .filter(|friend| friend.presence.is_available())
            .map(|friend| Effect::Inbound {
                from: friend.identity.clone(),
                notice: Notice::Presence(friend.snapshot()),
            })
            .collect();

        self.deliver(effects, None).await
    }

    pub(super) fn handle_message(&mut self, message: MessageStanza) {
        let Some(session) = self.session.as_mut() else {
            warn!("Dropped message before authentication");
            return;
        };

        let (Some(to), Some(body)) = (message.to.as_deref(), message.body.as_deref()) else {
            debug!("Dropped message without addressee or body");
            return;
        };

        if !message.is_chat() {
            debug!("Dropped {} message to {to}", message.kind);
            return;
        }

        if chat::record_sent(&mut session.roster, to, body) == Outcome::Ignored {
            debug!("{to} is not in the roster, message not recorded");
        }
    }
}
