use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures::{SinkExt, Stream, StreamExt};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use xmpp_mock_server::context::ServerContext;
use xmpp_mock_server::xmpp::framing::StanzaBuffer;
use xmpp_mock_server::{Config, Server};

const FRIENDS: &str = r#"{
    "alice": {
        "name": "Alice",
        "friends": [
            { "identity": "b@mock.local", "name": "Bob", "presence": "ONLINE" },
            { "identity": "c@mock.local", "name": "Carol" }
        ]
    }
}"#;

const OPEN: &str = "<?xml version='1.0'?><stream:stream xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams' to='mock.local' version='1.0'>";

struct Running {
    xmpp: SocketAddr,
    http: SocketAddr,
    context: ServerContext,
}

async fn start(fixture: Option<&str>) -> Running {
    let mut config = Config::local("mock.local");
    config.friends_fixture = fixture.map(|contents| {
        let path = std::env::temp_dir().join(format!(
            "friends-{}.json",
            guid_create::GUID::rand().to_string().to_lowercase()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    });

    let server = Server::bind(config).await.unwrap();
    let running = Running {
        xmpp: server.xmpp_addr().unwrap(),
        http: server.http_addr().unwrap(),
        context: server.context().clone(),
    };
    tokio::spawn(server.run());
    running
}

struct Client {
    socket: TcpStream,
    frames: StanzaBuffer,
}

impl Client {
    async fn connect(address: SocketAddr) -> Client {
        Client {
            socket: TcpStream::connect(address).await.unwrap(),
            frames: StanzaBuffer::new(),
        }
    }

    async fn write(&mut self, xml: &str) {
        self.socket.write_all(xml.as_bytes()).await.unwrap();
    }

    async fn read(&mut self) -> String {
        let mut buf = vec![0; 4096];
        loop {
            if let Some(frame) = self.frames.next_frame().unwrap() {
                return frame;
            }

            let received = timeout(Duration::from_secs(2), self.socket.read(&mut buf))
                .await
                .expect("server stayed silent")
                .unwrap();
            assert!(received > 0, "server closed the socket");
            self.frames.extend(&buf[..received]);
        }
    }

    /// Everything the server sends within `window`.
    async fn drain(&mut self, window: Duration) -> Vec<String> {
        let mut frames = Vec::new();
        let mut buf = vec![0; 4096];
        loop {
            while let Some(frame) = self.frames.next_frame().unwrap() {
                frames.push(frame);
            }

            match timeout(window, self.socket.read(&mut buf)).await {
                Ok(Ok(received)) if received > 0 => self.frames.extend(&buf[..received]),
                _ => return frames,
            }
        }
    }

    async fn sign_in(&mut self, user: &str) {
        self.write(OPEN).await;
        assert!(self.read().await.starts_with("<?xml"));
        assert!(self.read().await.contains("PLAIN"));

        let payload = STANDARD.encode(format!("\0{user}\0secret"));
        self.write(&format!(
            "<auth xmlns='urn:ietf:params:xml:ns:xmpp-sasl' mechanism='PLAIN'>{payload}</auth>"
        ))
        .await;
        assert!(self.read().await.starts_with("<success"));

        self.write(OPEN).await;
        assert!(self.read().await.starts_with("<?xml"));
        assert!(self.read().await.contains("xmpp-bind"));
    }
}

async fn request(address: SocketAddr, method: &str, path: &str, body: &str) -> (u16, String) {
    let mut socket = TcpStream::connect(address).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    timeout(Duration::from_secs(2), socket.read_to_string(&mut response))
        .await
        .expect("no HTTP response")
        .unwrap();

    let status = response
        .split(' ')
        .nth(1)
        .and_then(|status| status.parse().ok())
        .unwrap();
    (status, response)
}

async fn post(address: SocketAddr, path: &str, body: &str) -> (u16, Value) {
    let (status, response) = request(address, "POST", path, body).await;
    let (_, body) = response.split_once("\r\n\r\n").unwrap();
    (status, serde_json::from_str(body).unwrap())
}

async fn wait_until_signed_in(context: &ServerContext, user: &str) {
    for _ in 0..100 {
        if context.registry.lookup(user).unwrap().is_some() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{user} never signed in");
}

#[tokio::test]
async fn signs_in_over_tcp_and_lists_roster() {
    let server = start(Some(FRIENDS)).await;
    let mut client = Client::connect(server.xmpp).await;
    client.sign_in("alice").await;

    client
        .write("<iq type='set' id='bind_1'><bind xmlns='urn:ietf:params:xml:ns:xmpp-bind'><resource>game</resource></bind></iq>")
        .await;
    assert!(client.read().await.contains("<jid>alice@mock.local/game</jid>"));

    client
        .write("<iq type='get' id='roster_1'><query xmlns='jabber:iq:roster'/></iq>")
        .await;
    let roster = client.read().await;
    assert!(roster.contains("jid='b@mock.local' name='Bob' subscription='both'"));
    assert!(roster.contains("jid='c@mock.local' name='Carol' subscription='both'"));
}

/// Next text message from a WebSocket client, one stanza per message.
async fn receive_text<S>(socket: &mut S) -> String
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    loop {
        let message = timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("server stayed silent")
            .expect("server closed the socket")
            .unwrap();

        match message {
            Message::Text(text) => return text.as_str().to_string(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected message {other:?}"),
        }
    }
}

#[tokio::test]
async fn signs_in_over_websocket_and_lists_roster() {
    let server = start(Some(FRIENDS)).await;

    let mut request = format!("ws://{}/xmpp", server.http)
        .into_client_request()
        .unwrap();
    request
        .headers_mut()
        .insert("Sec-WebSocket-Protocol", HeaderValue::from_static("xmpp"));
    let (mut socket, response) = tokio_tungstenite::connect_async(request).await.unwrap();
    assert_eq!(response.headers()["sec-websocket-protocol"], "xmpp");

    socket.send(Message::text(OPEN.to_string())).await.unwrap();
    assert!(receive_text(&mut socket).await.starts_with("<?xml"));
    assert!(receive_text(&mut socket).await.contains("PLAIN"));

    let payload = STANDARD.encode("\0alice\0secret");
    socket
        .send(Message::text(format!(
            "<auth xmlns='urn:ietf:params:xml:ns:xmpp-sasl' mechanism='PLAIN'>{payload}</auth>"
        )))
        .await
        .unwrap();
    assert!(receive_text(&mut socket).await.starts_with("<success"));

    socket.send(Message::text(OPEN.to_string())).await.unwrap();
    assert!(receive_text(&mut socket).await.starts_with("<?xml"));
    assert!(receive_text(&mut socket).await.contains("xmpp-bind"));
    wait_until_signed_in(&server.context, "alice@mock.local").await;

    socket
        .send(Message::text(
            "<iq type='get' id='roster_1'><query xmlns='jabber:iq:roster'/></iq>".to_string(),
        ))
        .await
        .unwrap();
    let roster = receive_text(&mut socket).await;
    assert!(roster.starts_with("<iq type='result' id='roster_1'"));
    assert!(roster.contains("jid='b@mock.local' name='Bob' subscription='both'"));

    let (status, _) = post(server.http, "/admin/alice/b/sendMessage", r#"{"body":"hi"}"#).await;
    assert_eq!(status, 200);
    assert!(receive_text(&mut socket).await.contains("<body>hi</body>"));
}

#[tokio::test]
async fn second_tcp_session_gets_conflict() {
    let server = start(None).await;
    let mut first = Client::connect(server.xmpp).await;
    first.sign_in("alice").await;

    let mut second = Client::connect(server.xmpp).await;
    second.write(OPEN).await;
    second.read().await;
    second.read().await;
    second
        .write(&format!(
            "<auth xmlns='urn:ietf:params:xml:ns:xmpp-sasl' mechanism='PLAIN'>{}</auth>",
            STANDARD.encode("\0alice\0secret")
        ))
        .await;

    assert!(second.read().await.contains("<conflict"));
    assert_eq!(second.read().await, "</stream:stream>");
    assert_eq!(
        server.context.registry.identities().unwrap(),
        vec!["alice@mock.local".to_string()]
    );
}

#[tokio::test]
async fn admin_friend_request_reaches_the_client() {
    let server = start(None).await;
    let mut client = Client::connect(server.xmpp).await;
    client.sign_in("alice").await;
    wait_until_signed_in(&server.context, "alice@mock.local").await;

    let (status, reply) = post(server.http, "/admin/alice/x/sendFriendRequest", "").await;

    assert_eq!(status, 200);
    assert_eq!(reply["contact"], "x@mock.local");
    assert_eq!(reply["result"]["ask"], "subscribe");
    assert_eq!(
        client.read().await,
        "<presence from='x@mock.local' to='alice@mock.local' type='subscribe'/>"
    );
}

#[tokio::test]
async fn admin_rejects_unknown_targets_and_actions() {
    let server = start(None).await;
    let mut client = Client::connect(server.xmpp).await;
    client.sign_in("alice").await;
    wait_until_signed_in(&server.context, "alice@mock.local").await;

    let (status, reply) = post(
        server.http,
        "/admin/nobody/b/sendMessage",
        r#"{"body":"hi"}"#,
    )
    .await;
    assert_eq!(status, 404);
    assert!(reply["error"].as_str().unwrap().contains("nobody@mock.local"));

    let (status, _) = post(server.http, "/admin/alice/b/dance", "").await;
    assert_eq!(status, 400);

    let (status, _) = post(server.http, "/admin/alice/b/sendMessage", "").await;
    assert_eq!(status, 400);

    let (status, _) = post(server.http, "/admin/nobody/randomPresence", "").await;
    assert_eq!(status, 404);

    assert!(client.drain(Duration::from_millis(100)).await.is_empty());
}

#[tokio::test]
async fn message_generator_runs_until_stopped() {
    let server = start(Some(FRIENDS)).await;
    let mut client = Client::connect(server.xmpp).await;
    client.sign_in("alice").await;
    wait_until_signed_in(&server.context, "alice@mock.local").await;

    let (status, reply) = post(
        server.http,
        "/admin/alice/randomMessages",
        r#"{"interval":50}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(reply["result"]["interval"], 50);

    let message = client.read().await;
    assert!(message.starts_with("<message from='"));
    assert!(message.contains("type='chat'"));

    let (status, reply) = post(server.http, "/admin/alice/stopJobs", "").await;
    assert_eq!(status, 200);
    assert_eq!(reply["result"]["stopped"], 1);

    client.drain(Duration::from_millis(200)).await;
    assert!(client.drain(Duration::from_millis(300)).await.is_empty());
}

#[tokio::test]
async fn sessions_are_listed() {
    let server = start(None).await;
    let mut client = Client::connect(server.xmpp).await;
    client.sign_in("alice").await;
    wait_until_signed_in(&server.context, "alice@mock.local").await;

    let (status, response) = request(server.http, "GET", "/admin/sessions", "").await;

    assert_eq!(status, 200);
    assert!(response.contains(r#"{"sessions":["alice@mock.local"]}"#));
}

#[tokio::test]
async fn canned_responses_are_served_until_reset() {
    let server = start(None).await;

    let (status, _) = post(
        server.http,
        "/fixtures/set",
        r#"{"key":"/ofb/products","status":201,"headers":{"x-fixture":"yes"},"body":{"products":[]}}"#,
    )
    .await;
    assert_eq!(status, 200);

    let (status, response) = request(server.http, "GET", "/canned/ofb/products", "").await;
    assert_eq!(status, 201);
    assert!(response.contains("X-Fixture: yes"));
    assert!(response.ends_with(r#"{"products":[]}"#));

    let (status, _) = post(server.http, "/fixtures/reset", "").await;
    assert_eq!(status, 200);

    let (status, _) = request(server.http, "GET", "/canned/ofb/products", "").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn binding_a_taken_port_fails() {
    let first = Server::bind(Config::local("mock.local")).await.unwrap();

    let mut config = Config::local("mock.local");
    config.xmpp_addr = first.xmpp_addr().unwrap();

    assert!(Server::bind(config).await.is_err());
}
