use crate::errors::frame_error::FrameError;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Minimal owned XML tree, enough to route a stanza.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub(crate) fn from_start(start: &BytesStart<'_>) -> Result<Self, FrameError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Reads children and text until the end tag matching an already read start tag.
    pub(crate) fn read_content(
        self,
        reader: &mut Reader<&[u8]>,
    ) -> Result<Element, FrameError> {
        let mut stack = vec![self];

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(quick_xml::Error::from)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::End(_) => {
                    let done = stack.pop().ok_or(FrameError::Unterminated)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return Ok(done),
                    }
                }
                Event::Eof => return Err(FrameError::Unterminated),
                _ => (),
            }
        }
    }

    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn namespace(&self) -> Option<&str> {
        self.attr("xmlns")
    }

    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|child| child.local_name() == local_name)
    }

    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |child| child.local_name() == local_name)
    }

    /// Trimmed text of a direct child, if it has any.
    pub fn child_text(&self, local_name: &str) -> Option<&str> {
        self.child(local_name)
            .map(|child| child.text.trim())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Element {
        let mut reader = Reader::from_str(xml);
        loop {
            if let Event::Start(start) = reader.read_event().unwrap() {
                return Element::from_start(&start)
                    .unwrap()
                    .read_content(&mut reader)
                    .unwrap();
            }
        }
    }

    #[test]
    fn builds_nested_tree() {
        let element = parse(
            "<iq type='set' id='r1'><query xmlns='jabber:iq:roster'><item jid='b@mock' subscription='remove'/></query></iq>",
        );

        assert_eq!(element.local_name(), "iq");
        assert_eq!(element.attr("id"), Some("r1"));
        let query = element.child("query").unwrap();
        assert_eq!(query.namespace(), Some("jabber:iq:roster"));
        assert_eq!(query.children_named("item").count(), 1);
    }

    #[test]
    fn unescapes_text_and_attributes() {
        let element =
            parse("<message to='a&amp;b@mock'><body>1 &lt; 2</body></message>");

        assert_eq!(element.attr("to"), Some("a&b@mock"));
        assert_eq!(element.child_text("body"), Some("1 < 2"));
    }

    #[test]
    fn unterminated_element_is_an_error() {
        let mut reader = Reader::from_str("<presence><show>away</show>");
        let Event::Start(start) = reader.read_event().unwrap() else {
            panic!("expected start");
        };

        let result = Element::from_start(&start)
            .unwrap()
            .read_content(&mut reader);
        assert!(result.is_err());
    }

    #[test]
    fn prefixed_names_have_local_names() {
        let element = parse("<stream:features><bind/></stream:features>");
        assert_eq!(element.local_name(), "features");
        assert!(element.child("bind").is_some());
    }
}
