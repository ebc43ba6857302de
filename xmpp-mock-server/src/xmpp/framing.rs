use crate::errors::frame_error::FrameError;
use quick_xml::Reader;
use quick_xml::events::Event;

/// Input that never closes its stanza is dropped past this size.
const MAX_PENDING_BYTES: usize = 1 << 20;

enum Scan {
    Frame { start: usize, end: usize },
    Garbage(usize),
    Incomplete,
    Malformed { end: usize, error: FrameError },
}

/// Collects bytes from a transport and cuts them into top-level frames: the
/// stream header, whole stanzas, and the stream close tag.
#[derive(Debug, Default)]
pub struct StanzaBuffer {
    buffer: Vec<u8>,
}

impl StanzaBuffer {
    pub fn new() -> Self {
        StanzaBuffer::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Next complete frame. Malformed input is discarded up to where parsing stopped
    /// before the error is returned, so callers can keep reading.
    pub fn next_frame(&mut self) -> Result<Option<String>, FrameError> {
        match scan(&self.buffer) {
            Scan::Frame { start, end } => {
                let frame = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
                self.buffer.drain(..end);
                Ok(Some(frame))
            }

            Scan::Garbage(end) => {
                self.buffer.drain(..end);
                Err(FrameError::Garbage)
            }

            Scan::Incomplete => {
                if self.buffer.len() > MAX_PENDING_BYTES {
                    self.buffer.clear();
                    return Err(FrameError::Unterminated);
                }
                Ok(None)
            }

            Scan::Malformed { end, error } => {
                self.buffer.drain(..end);
                Err(error)
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn scan(buffer: &[u8]) -> Scan {
    let Some(start) = buffer.iter().position(|byte| !byte.is_ascii_whitespace()) else {
        return Scan::Incomplete;
    };

    // A lone end tag is how the client closes its stream
    if buffer[start..].starts_with(b"</") {
        return match buffer[start..].iter().position(|&byte| byte == b'>') {
            Some(offset) => Scan::Frame {
                start,
                end: start + offset + 1,
            },
            None => Scan::Incomplete,
        };
    }

    let mut reader = Reader::from_reader(buffer);

    let mut depth: u32 = 0;
    let mut stanza_start = start;

    loop {
        let position = reader.buffer_position() as usize;

        match reader.read_event() {
            Ok(Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_)) => continue,

            Ok(Event::Start(start_tag)) => {
                if depth == 0 && start_tag.name().local_name().as_ref() == b"stream" {
                    // The stream header never closes; it is a frame on its own
                    return Scan::Frame {
                        start,
                        end: reader.buffer_position() as usize,
                    };
                }

                if depth == 0 {
                    stanza_start = position;
                }
                depth += 1;
            }

            Ok(Event::Empty(_)) => {
                if depth == 0 {
                    return Scan::Frame {
                        start: position,
                        end: reader.buffer_position() as usize,
                    };
                }
            }

            Ok(Event::Text(text)) => {
                if depth == 0 && !text.iter().all(|byte| byte.is_ascii_whitespace()) {
                    return Scan::Garbage(reader.buffer_position() as usize);
                }
            }

            Ok(Event::CData(_)) => {
                if depth == 0 {
                    return Scan::Garbage(reader.buffer_position() as usize);
                }
            }

            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Scan::Frame {
                        start: stanza_start,
                        end: reader.buffer_position() as usize,
                    };
                }
            }

            Ok(Event::Eof) => return Scan::Incomplete,

            // The rest of a tag is still in flight
            Err(quick_xml::Error::Syntax(_)) => return Scan::Incomplete,

            // Drop what was read, keeping whatever follows the bad markup
            Err(error) => {
                let stopped = reader.buffer_position() as usize;
                let end = if stopped > start { stopped } else { buffer.len() };
                return Scan::Malformed {
                    end,
                    error: error.into(),
                };
            }
        }
    }
}
