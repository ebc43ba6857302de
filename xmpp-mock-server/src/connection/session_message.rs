use super::Connection;
use crate::admin::bridge;
use crate::errors::server_error::ServerError;
use crate::message::SessionMessage;
use crate::transport::{InboundTransport, OutboundTransport};
use log::{debug, trace};

impl<I: InboundTransport, O: OutboundTransport> Connection<I, O> {
    pub(super) async fn handle_session_message(
        &mut self,
        message: SessionMessage,
    ) -> Result<(), ServerError> {
        match message {
            SessionMessage::Bridge { command, reply } => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(());
                };

                trace!(
                    "Bridge: {} {} for {}",
                    command.contact,
                    command.action.name(),
                    session.identity()
                );

                let outcome =
                    bridge::transition(&mut session.roster, &command.contact, &command.action);
                let answer = bridge::reply(&outcome, &session.roster, &command.contact);

                // Stanzas go out before the caller hears back
                self.apply(outcome, None).await?;
                if reply.send(answer).is_err() {
                    debug!("Bridge caller for {} went away", command.contact);
                }
                Ok(())
            }

            SessionMessage::Bulk {
                generator,
                start,
                count,
                cancel,
            } => {
                if cancel.is_cancelled() {
                    return Ok(());
                }

                let Some(session) = self.session.as_ref() else {
                    return Ok(());
                };

                let actions = generator.actions(&session.roster.slice(start, count));
                for (contact, action) in actions {
                    let Some(session) = self.session.as_mut() else {
                        break;
                    };

                    if cancel.is_cancelled() {
                        break;
                    }

                    let outcome = bridge::transition(&mut session.roster, &contact, &action);
                    self.apply(outcome, None).await?;
                }
                Ok(())
            }
        }
    }
}
