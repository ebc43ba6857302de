use crate::context::ServerContext;
use crate::errors::server_error::ServerError;
use crate::message::SessionMessage;
use crate::presence::outcome::{Effect, Outcome};
use crate::session::Session;
use crate::session::pending::PendingRequest;
use crate::transport::{InboundTransport, OutboundTransport};
use crate::xmpp::framing::StanzaBuffer;
use crate::xmpp::outbound;
use crate::xmpp::stanza::Stanza;
use log::{debug, error, info, trace, warn};
use tokio::sync::mpsc;

mod iq;
mod presence;
mod session_message;
mod stream;

/// Bridge calls and bulk steps a session queues before the sender waits.
const SESSION_QUEUE: usize = 64;

/// One client stream, from the first stream header until the socket closes.
pub struct Connection<I, O> {
    inbound: I,
    outbound: O,
    context: ServerContext,
    frames: StanzaBuffer,
    stream_opens: u32,
    stream_from: Option<String>,
    session: Option<Session>,
    session_rx: Option<mpsc::Receiver<SessionMessage>>,
}

/// Drives a connection until it fails or closes, then unregisters its session.
pub async fn serve<I: InboundTransport, O: OutboundTransport>(
    inbound: I,
    outbound: O,
    context: ServerContext,
) {
    let mut connection = Connection::new(inbound, outbound, context);
    loop {
        if let Err(error) = connection.listen().await {
            match error {
                ServerError::Disconnected | ServerError::StreamClosed => info!("{error}"),
                _ => error!("{error}"),
            }

            connection.teardown().await;
            break;
        }
    }
}

async fn next_message(
    session_rx: &mut Option<mpsc::Receiver<SessionMessage>>,
) -> Option<SessionMessage> {
    match session_rx {
        Some(session_rx) => session_rx.recv().await,
        None => std::future::pending().await,
    }
}

impl<I: InboundTransport, O: OutboundTransport> Connection<I, O> {
    pub fn new(inbound: I, outbound: O, context: ServerContext) -> Self {
        Connection {
            inbound,
            outbound,
            context,
            frames: StanzaBuffer::new(),
            stream_opens: 0,
            stream_from: None,
            session: None,
            session_rx: None,
        }
    }

    /// Handles whatever comes first: client bytes or work queued for the session.
    pub async fn listen(&mut self) -> Result<(), ServerError> {
        tokio::select! {
            received = self.inbound.receive() => {
                let Some(bytes) = received? else {
                    return Err(ServerError::Disconnected);
                };
                self.handle_bytes(&bytes).await
            }

            Some(message) = next_message(&mut self.session_rx) => {
                self.handle_session_message(message).await
            }
        }
    }

    async fn handle_bytes(&mut self, bytes: &[u8]) -> Result<(), ServerError> {
        self.frames.extend(bytes);
        loop {
            match self.frames.next_frame() {
                Ok(Some(frame)) => self.handle_frame(&frame).await?,
                Ok(None) => return Ok(()),
                Err(error) => warn!("Dropped malformed input: {error}"),
            }
        }
    }

    async fn handle_frame(&mut self, frame: &str) -> Result<(), ServerError> {
        trace!("C: {frame}");

        let stanza = match Stanza::parse(frame) {
            Ok(stanza) => stanza,
            Err(error) => {
                warn!("Dropped malformed frame: {error}");
                return Ok(());
            }
        };

        match stanza {
            Stanza::StreamOpen { from, .. } => self.handle_stream_open(from).await,
            Stanza::StreamClose => {
                self.send(outbound::STREAM_CLOSE).await?;
                Err(ServerError::StreamClosed)
            }
            Stanza::Auth { payload, .. } => self.handle_auth(payload.as_deref()).await,
            Stanza::Iq(iq) => self.handle_iq(iq).await,
            Stanza::Presence(presence) => self.handle_presence(presence).await,
            Stanza::Message(message) => {
                self.handle_message(message);
                Ok(())
            }
            Stanza::Unknown(name) => {
                warn!("Unhandled stanza: {name}");
                Ok(())
            }
        }
    }

    async fn send(&mut self, frame: &str) -> Result<(), ServerError> {
        self.outbound.send(frame).await?;
        trace!("S: {frame}");
        Ok(())
    }

    /// Turns a transition outcome into stanzas for the local user. `reply_to` is a
    /// client request answered once the outcome is delivered.
    async fn apply(
        &mut self,
        outcome: Outcome,
        reply_to: Option<String>,
    ) -> Result<(), ServerError> {
        let effects = match outcome {
            Outcome::Applied(effects) => effects,
            Outcome::Ignored => {
                debug!("Transition ignored");
                Vec::new()
            }
            Outcome::Rejected(error) => {
                debug!("Transition rejected: {error}");
                Vec::new()
            }
        };

        self.deliver(effects, reply_to).await
    }

    async fn deliver(
        &mut self,
        effects: Vec<Effect>,
        mut reply_to: Option<String>,
    ) -> Result<(), ServerError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        let local = session.identity().clone();
        let mut replies = Vec::new();

        for effect in effects {
            match effect {
                Effect::Inbound { from, notice } => {
                    replies.push(outbound::notice(&from, &local, &notice));
                }

                Effect::Outbound { to, notice } => {
                    debug!("{local} -> {to}: {notice:?} has no peer to reach");
                }

                Effect::RosterPush { item, then } => {
                    let id = session.pending.issue(PendingRequest {
                        then,
                        reply_to: reply_to.take(),
                    });
                    replies.push(outbound::roster_push(&id, &local, &item));
                }
            }
        }

        if let Some(id) = reply_to {
            replies.push(outbound::iq_result(&id, &local));
        }

        for reply in replies {
            self.send(&reply).await?;
        }
        Ok(())
    }

    /// Final step of every connection: the session leaves the registry.
    async fn teardown(&mut self) {
        self.session_rx = None;

        if let Some(mut session) = self.session.take() {
            let identity = session.identity().clone();
            match self.context.registry.unregister(&identity) {
                Ok(_) => info!("{identity} signed out"),
                Err(error) => error!("Could not unregister {identity}: {error}"),
            }

            let abandoned = session.pending.clear();
            if abandoned > 0 {
                debug!("Abandoned {abandoned} pending requests of {identity}");
            }
        }

        self.outbound.close().await;
    }
}
