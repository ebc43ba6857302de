//! The slice of XMPP the mock speaks: stream negotiation, stub SASL, roster and
//! privacy queries, presence and chat messages.

pub mod element;
pub mod framing;
pub mod outbound;
pub mod stanza;

pub const NS_CLIENT: &str = "jabber:client";
pub const NS_STREAMS: &str = "http://etherx.jabber.org/streams";
pub const NS_SASL: &str = "urn:ietf:params:xml:ns:xmpp-sasl";
pub const NS_BIND: &str = "urn:ietf:params:xml:ns:xmpp-bind";
pub const NS_SESSION: &str = "urn:ietf:params:xml:ns:xmpp-session";
pub const NS_STREAM_ERRORS: &str = "urn:ietf:params:xml:ns:xmpp-streams";
pub const NS_ROSTER: &str = "jabber:iq:roster";
pub const NS_PRIVACY: &str = "jabber:iq:privacy";
pub const NS_GAME: &str = "urn:xmpp-mock:game";
