use super::Connection;
use crate::errors::server_error::ServerError;
use crate::presence::outcome::{Origin, RosterItem};
use crate::presence::subscription;
use crate::transport::{InboundTransport, OutboundTransport};
use crate::xmpp::outbound;
use crate::xmpp::stanza::{Iq, IqKind, IqPayload};
use log::{debug, warn};

impl<I: InboundTransport, O: OutboundTransport> Connection<I, O> {
    pub(super) async fn handle_iq(&mut self, iq: Iq) -> Result<(), ServerError> {
        let Some(session) = self.session.as_mut() else {
            warn!("Dropped iq before authentication");
            return Ok(());
        };

        let id = iq.id.unwrap_or_default();
        let local = session.identity().clone();

        match (iq.kind, iq.payload) {
            (IqKind::Result, _) => match session.pending.resume(&id) {
                Some(pending) => self.deliver(pending.then, pending.reply_to).await,
                None => {
                    debug!("Result for unknown request {id}");
                    Ok(())
                }
            },

            (IqKind::Error, _) => {
                if session.pending.resume(&id).is_some() {
                    warn!("{local} refused roster push {id}");
                }
                Ok(())
            }

            (IqKind::Get, IqPayload::Roster(_)) => {
                let items: Vec<RosterItem> = session.roster.all().map(RosterItem::of).collect();
                self.send(&outbound::roster_result(&id, &local, items.iter()))
                    .await
            }

            (IqKind::Set, IqPayload::Roster(items)) => {
                let Some(item) = items.into_iter().next() else {
                    return self.send(&outbound::iq_result(&id, &local)).await;
                };

                let outcome = if item.remove {
                    subscription::remove(&mut session.roster, &item.jid, Origin::LocalUser)
                } else {
                    subscription::add_contact(&mut session.roster, &item.jid, item.name.as_deref())
                };
                self.apply(outcome, Some(id)).await
            }

            (IqKind::Get, IqPayload::Privacy(_)) => {
                let reply = outbound::privacy_result(&id, &local, &session.block_list);
                self.send(&reply).await
            }

            (IqKind::Set, IqPayload::Privacy(denied)) => {
                session.block_list = denied;
                self.send(&outbound::iq_result(&id, &local)).await
            }

            (IqKind::Set, IqPayload::Bind { resource }) => {
                let resource = resource.unwrap_or_else(|| {
                    guid_create::GUID::rand().to_string().to_lowercase()
                });
                session.resource = Some(resource);

                let reply = outbound::bind_result(&id, &session.jid());
                self.send(&reply).await
            }

            (IqKind::Set, IqPayload::Session) => {
                self.send(&outbound::iq_result(&id, &local)).await
            }

            (kind, payload) => {
                warn!("Unhandled iq {kind:?}: {payload:?}");
                Ok(())
            }
        }
    }
}
