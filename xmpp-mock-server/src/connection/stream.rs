use super::{Connection, SESSION_QUEUE};
use crate::errors::server_error::ServerError;
use crate::models::identity;
use crate::registry::SessionHandle;
use crate::session::Session;
use crate::transport::{InboundTransport, OutboundTransport};
use crate::xmpp::outbound;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{error, info, warn};
use tokio::sync::mpsc;

/// User named by a SASL PLAIN payload: `authzid \0 authcid \0 password`, base64 encoded.
pub(crate) fn plain_identity(payload: &str) -> Option<String> {
    let decoded = STANDARD.decode(payload.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let mut parts = decoded.split('\0');
    let authzid = parts.next()?;
    let authcid = parts.next()?;

    let name = if authzid.is_empty() { authcid } else { authzid };
    (!name.is_empty()).then(|| name.to_string())
}

impl<I: InboundTransport, O: OutboundTransport> Connection<I, O> {
    pub(super) async fn handle_stream_open(
        &mut self,
        from: Option<String>,
    ) -> Result<(), ServerError> {
        self.stream_opens += 1;
        if from.is_some() {
            self.stream_from = from;
        }

        let stream_id = guid_create::GUID::rand().to_string().to_lowercase();
        self.send(&outbound::stream_header(&self.context.domain, &stream_id))
            .await?;

        match self.stream_opens {
            1 => self.send(&outbound::features(false)).await,
            2 => self.send(&outbound::features(true)).await,
            _ => Ok(()),
        }
    }

    /// Accepts any credentials. The session is only registered once its profile is
    /// loaded, and a second session for the same user is turned away.
    pub(super) async fn handle_auth(&mut self, payload: Option<&str>) -> Result<(), ServerError> {
        if self.session.is_some() {
            warn!("Ignored auth on an authenticated stream");
            return Ok(());
        }

        let name = payload.and_then(plain_identity).or_else(|| self.stream_from.clone());
        let identity = name
            .map(|name| identity::qualify(&name, &self.context.domain))
            .filter(|address| identity::is_address(address));

        let Some(identity) = identity else {
            self.send(&outbound::auth_failure()).await?;
            self.send(outbound::STREAM_CLOSE).await?;
            return Err(ServerError::Unidentified);
        };

        let profile = match self.context.directory.profile(&identity).await {
            Ok(profile) => profile,
            Err(error) => {
                error!("Could not load profile for {identity}: {error}");
                self.send(&outbound::auth_failure()).await?;
                self.send(outbound::STREAM_CLOSE).await?;
                return Err(error.into());
            }
        };

        let session = Session::new(profile.local_user(&identity), profile.roster());
        let (session_tx, session_rx) = mpsc::channel(SESSION_QUEUE);
        let handle = SessionHandle::new(session.session_id.clone(), session_tx);

        if let Err(error) = self.context.registry.register(&identity, handle) {
            warn!("Turned away {identity}: {error}");
            self.send(&outbound::conflict()).await?;
            self.send(outbound::STREAM_CLOSE).await?;
            return Err(error.into());
        }

        info!("{identity} signed in with {} friends", session.roster.len());
        self.session = Some(session);
        self.session_rx = Some(session_rx);

        self.send(&outbound::auth_success()).await
    }
}
