use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Frame is empty")]
    Empty,
    #[error("Frame ended before its root element was closed")]
    Unterminated,
    #[error("Discarded text outside of any stanza")]
    Garbage,
}
