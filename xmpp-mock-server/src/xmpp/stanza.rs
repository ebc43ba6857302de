use super::element::Element;
use super::{NS_BIND, NS_PRIVACY, NS_ROSTER, NS_SESSION};
use crate::errors::frame_error::FrameError;
use crate::models::identity;
use quick_xml::Reader;
use quick_xml::events::Event;

/// One inbound frame, classified by its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stanza {
    StreamOpen {
        from: Option<String>,
        to: Option<String>,
    },
    StreamClose,
    Auth {
        mechanism: Option<String>,
        payload: Option<String>,
    },
    Iq(Iq),
    Presence(PresenceStanza),
    Message(MessageStanza),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IqKind {
    Get,
    Set,
    Result,
    Error,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterItemRequest {
    pub jid: String,
    pub name: Option<String>,
    pub remove: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IqPayload {
    Roster(Vec<RosterItemRequest>),
    /// Identities on the deny list.
    Privacy(Vec<String>),
    Bind { resource: Option<String> },
    Session,
    Empty,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iq {
    pub id: Option<String>,
    pub kind: IqKind,
    pub payload: IqPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceKind {
    Available,
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Unavailable,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceStanza {
    pub to: Option<String>,
    pub kind: PresenceKind,
    pub show: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStanza {
    pub to: Option<String>,
    pub kind: String,
    pub body: Option<String>,
}

impl MessageStanza {
    pub fn is_chat(&self) -> bool {
        self.kind == "chat"
    }
}

impl Stanza {
    pub fn parse(frame: &str) -> Result<Stanza, FrameError> {
        let frame = frame.trim();
        if frame.is_empty() {
            return Err(FrameError::Empty);
        }

        if let Some(end_tag) = frame.strip_prefix("</") {
            let name = end_tag.trim_end_matches('>').trim();
            return Ok(match name.rsplit(':').next() {
                Some("stream") => Stanza::StreamClose,
                _ => Stanza::Unknown(name.to_string()),
            });
        }

        let mut reader = Reader::from_str(frame);
        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let element = Element::from_start(&start)?;
                    if element.local_name() == "stream" {
                        return Ok(Stanza::StreamOpen {
                            from: element.attr("from").map(str::to_string),
                            to: element.attr("to").map(str::to_string),
                        });
                    }

                    return Ok(Stanza::classify(element.read_content(&mut reader)?));
                }
                Event::Empty(start) => {
                    return Ok(Stanza::classify(Element::from_start(&start)?));
                }
                Event::Eof => return Err(FrameError::Empty),
                _ => (),
            }
        }
    }

    fn classify(element: Element) -> Stanza {
        match element.local_name() {
            "auth" => Stanza::Auth {
                mechanism: element.attr("mechanism").map(str::to_string),
                payload: Some(element.text.trim())
                    .filter(|text| !text.is_empty())
                    .map(str::to_string),
            },
            "iq" => Stanza::Iq(Iq::from_element(&element)),
            "presence" => Stanza::Presence(PresenceStanza::from_element(&element)),
            "message" => Stanza::Message(MessageStanza {
                to: bare_attr(&element, "to"),
                kind: element.attr("type").unwrap_or("normal").to_string(),
                body: element.child_text("body").map(str::to_string),
            }),
            _ => Stanza::Unknown(element.name.clone()),
        }
    }
}

fn bare_attr(element: &Element, key: &str) -> Option<String> {
    element
        .attr(key)
        .map(|jid| identity::bare(jid.trim()).to_string())
        .filter(|jid| !jid.is_empty())
}

impl Iq {
    fn from_element(element: &Element) -> Iq {
        let kind = match element.attr("type") {
            Some("get") => IqKind::Get,
            Some("set") => IqKind::Set,
            Some("result") => IqKind::Result,
            Some("error") => IqKind::Error,
            _ => IqKind::Other,
        };

        let payload = match element.children.first() {
            None => IqPayload::Empty,
            Some(child) => match child.namespace() {
                Some(NS_ROSTER) => IqPayload::Roster(
                    child
                        .children_named("item")
                        .filter_map(|item| {
                            Some(RosterItemRequest {
                                jid: bare_attr(item, "jid")?,
                                name: item.attr("name").map(str::to_string),
                                remove: item.attr("subscription") == Some("remove"),
                            })
                        })
                        .collect(),
                ),
                Some(NS_PRIVACY) => IqPayload::Privacy(
                    child
                        .children_named("list")
                        .flat_map(|list| list.children_named("item"))
                        .filter(|item| item.attr("action").unwrap_or("deny") == "deny")
                        .filter_map(|item| item.attr("value"))
                        .map(|value| identity::bare(value).to_string())
                        .collect(),
                ),
                Some(NS_BIND) => IqPayload::Bind {
                    resource: child.child_text("resource").map(str::to_string),
                },
                Some(NS_SESSION) => IqPayload::Session,
                Some(namespace) => IqPayload::Other(namespace.to_string()),
                None => IqPayload::Other(child.name.clone()),
            },
        };

        Iq {
            id: element.attr("id").map(str::to_string),
            kind,
            payload,
        }
    }
}

impl PresenceStanza {
    fn from_element(element: &Element) -> PresenceStanza {
        let kind = match element.attr("type") {
            None | Some("available") => PresenceKind::Available,
            Some("subscribe") => PresenceKind::Subscribe,
            Some("subscribed") => PresenceKind::Subscribed,
            Some("unsubscribe") => PresenceKind::Unsubscribe,
            Some("unsubscribed") => PresenceKind::Unsubscribed,
            Some("unavailable") => PresenceKind::Unavailable,
            Some(other) => PresenceKind::Other(other.to_string()),
        };

        PresenceStanza {
            to: bare_attr(element, "to"),
            kind,
            show: element.child_text("show").map(str::to_string),
            status: element.child_text("status").map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_open_keeps_addresses() {
        let stanza = Stanza::parse(
            "<?xml version='1.0'?><stream:stream xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams' from='alice@mock.local' to='mock.local' version='1.0'>",
        )
        .unwrap();

        assert_eq!(
            stanza,
            Stanza::StreamOpen {
                from: Some("alice@mock.local".to_string()),
                to: Some("mock.local".to_string()),
            }
        );
    }

    #[test]
    fn stream_close() {
        assert_eq!(Stanza::parse("</stream:stream>").unwrap(), Stanza::StreamClose);
    }

    #[test]
    fn auth_payload() {
        let stanza = Stanza::parse(
            "<auth xmlns='urn:ietf:params:xml:ns:xmpp-sasl' mechanism='PLAIN'>AGFsaWNlAHNlY3JldA==</auth>",
        )
        .unwrap();

        assert_eq!(
            stanza,
            Stanza::Auth {
                mechanism: Some("PLAIN".to_string()),
                payload: Some("AGFsaWNlAHNlY3JldA==".to_string()),
            }
        );
    }

    #[test]
    fn roster_removal_query() {
        let stanza = Stanza::parse(
            "<iq type='set' id='r1'><query xmlns='jabber:iq:roster'><item jid='b@mock/home' subscription='remove'/></query></iq>",
        )
        .unwrap();

        assert_eq!(
            stanza,
            Stanza::Iq(Iq {
                id: Some("r1".to_string()),
                kind: IqKind::Set,
                payload: IqPayload::Roster(vec![RosterItemRequest {
                    jid: "b@mock".to_string(),
                    name: None,
                    remove: true,
                }]),
            })
        );
    }

    #[test]
    fn privacy_list_keeps_denied_items() {
        let stanza = Stanza::parse(
            "<iq type='set' id='p1'><query xmlns='jabber:iq:privacy'><list name='blocked'><item type='jid' value='x@mock' action='deny' order='1'/><item type='jid' value='y@mock' action='allow' order='2'/></list></query></iq>",
        )
        .unwrap();

        let Stanza::Iq(iq) = stanza else {
            panic!("expected an iq");
        };
        assert_eq!(iq.payload, IqPayload::Privacy(vec!["x@mock".to_string()]));
    }

    #[test]
    fn result_without_payload() {
        let Stanza::Iq(iq) = Stanza::parse("<iq type='result' id='7'/>").unwrap() else {
            panic!("expected an iq");
        };

        assert_eq!(iq.kind, IqKind::Result);
        assert_eq!(iq.payload, IqPayload::Empty);
    }

    #[test]
    fn presence_with_show() {
        let stanza =
            Stanza::parse("<presence><show>away</show><status>brb</status></presence>").unwrap();

        assert_eq!(
            stanza,
            Stanza::Presence(PresenceStanza {
                to: None,
                kind: PresenceKind::Available,
                show: Some("away".to_string()),
                status: Some("brb".to_string()),
            })
        );
    }

    #[test]
    fn subscription_presence() {
        let Stanza::Presence(presence) =
            Stanza::parse("<presence to='b@mock' type='subscribe'/>").unwrap()
        else {
            panic!("expected a presence");
        };

        assert_eq!(presence.kind, PresenceKind::Subscribe);
        assert_eq!(presence.to.as_deref(), Some("b@mock"));
    }

    #[test]
    fn chat_message() {
        let Stanza::Message(message) =
            Stanza::parse("<message to='b@mock' type='chat'><body>hello</body></message>").unwrap()
        else {
            panic!("expected a message");
        };

        assert!(message.is_chat());
        assert_eq!(message.body.as_deref(), Some("hello"));
    }

    #[test]
    fn unknown_root() {
        assert_eq!(
            Stanza::parse("<starttls xmlns='urn:ietf:params:xml:ns:xmpp-tls'/>").unwrap(),
            Stanza::Unknown("starttls".to_string())
        );
    }

    #[test]
    fn broken_frame_is_an_error() {
        assert!(Stanza::parse("<iq type='get'><query></iq>").is_err());
        assert!(matches!(Stanza::parse("   "), Err(FrameError::Empty)));
    }
}
