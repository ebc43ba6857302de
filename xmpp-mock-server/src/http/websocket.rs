use crate::connection;
use crate::context::ServerContext;
use crate::transport::websocket;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;
use log::debug;

/// `GET /xmpp`, XMPP framed over WebSocket text messages.
pub async fn upgrade(State(context): State<ServerContext>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.protocols(["xmpp"]).on_upgrade(move |socket| async move {
        debug!("WebSocket client connected");
        let (inbound, outbound) = websocket::split(socket);
        connection::serve(inbound, outbound, context).await;
    })
}
